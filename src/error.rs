//! Error types and handling for the travel planner

use thiserror::Error;

/// Main error type for the travel planner
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A required request field is absent
    #[error("Missing required key: {field}")]
    MissingField { field: &'static str },

    /// The request document could not be interpreted at all
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// JSON encoding or decoding errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl PlannerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new invalid request error
    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Name of the missing field for validation failures
    #[must_use]
    pub fn missing_field(&self) -> Option<&'static str> {
        match self {
            PlannerError::MissingField { field } => Some(*field),
            _ => None,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PlannerError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            PlannerError::MissingField { field } => {
                format!("The travel request is missing the '{field}' field.")
            }
            PlannerError::InvalidRequest { message } => format!("Invalid request: {message}"),
            PlannerError::Serialization { .. } => {
                "The travel request is not valid JSON.".to_string()
            }
            PlannerError::Io { .. } => {
                "File operation failed. Please check file paths and permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = PlannerError::config("missing endpoint");
        assert!(matches!(config_err, PlannerError::Config { .. }));

        let request_err = PlannerError::invalid_request("not an object");
        assert!(matches!(request_err, PlannerError::InvalidRequest { .. }));
    }

    #[test]
    fn test_missing_field_display() {
        let err = PlannerError::MissingField {
            field: "start_date",
        };
        assert_eq!(err.to_string(), "Missing required key: start_date");
        assert_eq!(err.missing_field(), Some("start_date"));
        assert!(err.user_message().contains("start_date"));
    }

    #[test]
    fn test_user_messages() {
        let config_err = PlannerError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));
        assert_eq!(config_err.missing_field(), None);

        let request_err = PlannerError::invalid_request("expected an object");
        assert!(request_err.user_message().contains("expected an object"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let planner_err: PlannerError = io_err.into();
        assert!(matches!(planner_err, PlannerError::Io { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let planner_err: PlannerError = json_err.into();
        assert!(matches!(planner_err, PlannerError::Serialization { .. }));
    }
}
