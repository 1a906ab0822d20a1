use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use travel_planner::{
    PlannerConfig, PlannerError, TravelPlanner, TravelRequest, logging, write_plan,
};

#[derive(Debug, Parser)]
#[command(
    name = "travel-planner",
    version,
    about = "Aggregated flight, hotel and weather travel planning",
    after_help = "Examples:\n  travel-planner plan --request trip.json\n  travel-planner validate --request trip.json\n  travel-planner sample > trip.json"
)]
struct Cli {
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Query all providers and write the travel plan document")]
    Plan {
        #[arg(long, help = "Travel request JSON file (defaults to the Paris sample)")]
        request: Option<PathBuf>,
        #[arg(long, help = "Where to write the plan (defaults to output.path)")]
        output: Option<PathBuf>,
    },
    #[command(about = "Check a travel request for missing fields")]
    Validate {
        #[arg(long)]
        request: PathBuf,
    },
    #[command(about = "Print the sample travel request")]
    Sample,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            match e.downcast_ref::<PlannerError>() {
                Some(planner_error) => eprintln!("{}", planner_error.user_message()),
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Command::Sample = cli.command {
        let sample = serde_json::to_string_pretty(&TravelRequest::sample())?;
        println!("{sample}");
        return Ok(());
    }

    let config = PlannerConfig::load_from_path(cli.config)?;
    logging::init(&config.logging)?;

    match cli.command {
        Command::Plan { request, output } => {
            let document = match request {
                Some(path) => read_request(&path)?,
                None => serde_json::to_value(TravelRequest::sample())?,
            };

            let planner = TravelPlanner::new(&config)?;
            let plan = planner.plan_from_json(&document).await?;

            let output = output.unwrap_or_else(|| config.output_path().to_path_buf());
            write_plan(&plan, &output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Travel plan written to {}", output.display());
        }
        Command::Validate { request } => {
            let text = std::fs::read_to_string(&request)
                .with_context(|| format!("Failed to read {}", request.display()))?;
            TravelRequest::parse(&text)?;
            info!("{} is a valid travel request", request.display());
            println!("{} is a valid travel request", request.display());
        }
        Command::Sample => {}
    }

    Ok(())
}

fn read_request(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document = serde_json::from_str(&text).map_err(PlannerError::from)?;
    Ok(document)
}
