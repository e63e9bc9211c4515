use agroclima::{export, Agroclima, AgroclimaError, HarvestConfig};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::{error, info};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "agroclima", version, about = "Harvest Brazilian agro-climate data")]
struct Cli {
    /// JSON configuration file; missing fields take their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output table (.csv, or .parquet)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Monthly El Niño / La Niña phases from the ONI table
    Enso,
    /// Suitable soil-management days per SISDAGRO station and practice
    SoilDays {
        /// Planting date (YYYY-MM-DD), defaults to thirty days ago
        #[arg(long)]
        planting_date: Option<NaiveDate>,
    },
    /// Frost occurrences from conventional INMET stations
    Frost {
        /// First month to query (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last month to query (YYYY-MM-DD), defaults to today
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Download and extract the INMET historical station archives
    Historical {
        #[arg(long, default_value = "Dados Historicos")]
        dest: PathBuf,
    },
}

async fn run(cli: Cli) -> Result<(), AgroclimaError> {
    let config = match &cli.config {
        Some(path) => HarvestConfig::from_json_file(path)?,
        None => HarvestConfig::default(),
    };
    let client = Agroclima::with_config(config).await?;
    let output = cli.output;
    let output_or = |default: &str| output.clone().unwrap_or_else(|| PathBuf::from(default));

    match cli.command {
        Command::Enso => {
            let rows = client.enso_phases().await?;
            export(&rows, &output_or("resultados_oni.csv")).await?;
        }
        Command::SoilDays { planting_date } => {
            let rows = client
                .soil_workability()
                .maybe_planting_date(planting_date)
                .call()
                .await?;
            export(&rows, &output_or("dias_aptos_manejo_solo.csv")).await?;
        }
        Command::Frost { start, end } => {
            let rows = client
                .frost_events()
                .maybe_start(start)
                .maybe_end(end)
                .call()
                .await?;
            export(&rows, &output_or("dados_geada.csv")).await?;
        }
        Command::Historical { dest } => {
            let extracted = client.historical_archives().destination(dest).call().await?;
            info!("Extracted {} archives", extracted.len());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                error!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
