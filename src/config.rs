//! Configuration management for the travel planner
//!
//! Handles loading configuration from files, environment variables,
//! and the conventional credential variables, and validates the result.

use crate::PlannerError;
use crate::lookup::Provider;
use anyhow::{Context, Result};
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Credential variables read on top of every other configuration source.
pub const CREDENTIAL_VARIABLES: [(&str, &str); 4] = [
    ("FLIGHT_API_KEY", "flights.api_key"),
    ("HOTEL_API_KEY", "hotels.api_key"),
    ("WEATHER_API_KEY", "weather.api_key"),
    ("LLM_API_KEY", "generation.api_key"),
];

/// Root configuration structure for the travel planner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Flight search provider
    pub flights: ProviderConfig,
    /// Hotel search provider
    pub hotels: ProviderConfig,
    /// Weather forecast provider
    pub weather: ProviderConfig,
    /// Itinerary generation service
    pub generation: GenerationConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Output artifact settings
    pub output: OutputConfig,
}

/// Settings shared by the three lookup providers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Bearer credential sent with every request
    pub api_key: Option<String>,
    /// Base URL; empty means the provider's public endpoint
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

/// Chat-completion service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Generation credential; generation is disabled when absent
    pub api_key: Option<String>,
    /// Full URL of the chat-completion endpoint
    pub endpoint: String,
    /// Model identifier
    pub model: String,
    /// Token budget for the completion
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

/// Output artifact settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where the plan document is written
    pub path: PathBuf,
}

fn default_timeout() -> u64 {
    30
}

fn default_generation_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_generation_model() -> String {
    "gpt-4".to_string()
}

fn default_max_tokens() -> u32 {
    1500
}

fn default_temperature() -> f32 {
    0.7
}

fn default_generation_timeout() -> u64 {
    120
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("travel_plan.json")
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_generation_endpoint(),
            model: default_generation_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_seconds: default_generation_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from the given file (or the default location) and the process environment
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        Self::load_with_env(config_path, |name| std::env::var(name).ok())
    }

    /// Load configuration, resolving the conventional credential variables through `env`
    pub fn load_with_env<F>(config_path: Option<PathBuf>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Config::builder();

        let config_file = config_path.or_else(Self::default_config_file);
        if let Some(config_file) = config_file {
            if config_file.exists() {
                builder = builder.add_source(
                    File::from(config_file.clone())
                        .required(false)
                        .format(config::FileFormat::Toml),
                );
            }
        }

        // TRAVEL_PLANNER_<SECTION>__<KEY>
        builder = builder.add_source(
            Environment::with_prefix("TRAVEL_PLANNER")
                .prefix_separator("_")
                .separator("__"),
        );

        builder = Self::apply_credential_overrides(builder, env)?;

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: PlannerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    fn apply_credential_overrides<F>(
        mut builder: ConfigBuilder<DefaultState>,
        env: F,
    ) -> Result<ConfigBuilder<DefaultState>>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (variable, key) in CREDENTIAL_VARIABLES {
            builder = builder
                .set_override_option(key, env(variable))
                .with_context(|| format!("Failed to apply {variable}"))?;
        }
        Ok(builder)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travel-planner").join("config.toml"))
    }

    fn default_config_file() -> Option<PathBuf> {
        Self::get_config_path()
            .filter(|path| path.exists())
            .or_else(|| Some(PathBuf::from("travel-planner.toml")))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        for (provider, section) in [
            (Provider::Flights, &mut self.flights),
            (Provider::Hotels, &mut self.hotels),
            (Provider::Weather, &mut self.weather),
        ] {
            if section.base_url.is_empty() {
                section.base_url = provider.default_base_url().to_string();
            }
            if section.timeout_seconds == 0 {
                section.timeout_seconds = default_timeout();
            }
            normalize_key(&mut section.api_key);
        }

        normalize_key(&mut self.generation.api_key);
        if self.generation.endpoint.is_empty() {
            self.generation.endpoint = default_generation_endpoint();
        }
        if self.generation.model.is_empty() {
            self.generation.model = default_generation_model();
        }
        if self.generation.timeout_seconds == 0 {
            self.generation.timeout_seconds = default_generation_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.output.path.as_os_str().is_empty() {
            self.output.path = default_output_path();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        let keys = [
            ("flights", &self.flights.api_key),
            ("hotels", &self.hotels.api_key),
            ("weather", &self.weather.api_key),
            ("generation", &self.generation.api_key),
        ];

        for (section, key) in keys {
            if let Some(key) = key {
                if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
                    return Err(PlannerError::config(format!(
                        "The {section} API key contains whitespace or control characters."
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        let timeouts = [
            ("flights", self.flights.timeout_seconds),
            ("hotels", self.hotels.timeout_seconds),
            ("weather", self.weather.timeout_seconds),
            ("generation", self.generation.timeout_seconds),
        ];
        for (section, timeout) in timeouts {
            if !(1..=300).contains(&timeout) {
                return Err(PlannerError::config(format!(
                    "The {section} timeout must be between 1 and 300 seconds"
                ))
                .into());
            }
        }

        if self.generation.max_tokens == 0 || self.generation.max_tokens > 32_768 {
            return Err(
                PlannerError::config("Generation max_tokens must be between 1 and 32768").into(),
            );
        }

        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(
                PlannerError::config("Generation temperature must be between 0.0 and 2.0").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(PlannerError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("flights", self.flights.base_url.as_str()),
            ("hotels", self.hotels.base_url.as_str()),
            ("weather", self.weather.base_url.as_str()),
            ("generation", self.generation.endpoint.as_str()),
        ];
        for (section, url) in urls {
            if !is_http_url(url) {
                return Err(PlannerError::config(format!(
                    "The {section} URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Where the plan document goes, unless the caller overrides it
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output.path
    }
}

fn normalize_key(key: &mut Option<String>) {
    if key.as_deref().is_some_and(|k| k.trim().is_empty()) {
        *key = None;
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
