use crate::config::SettingsOverrides;
use crate::utils::constants::DEFAULT_CONFIG_FILE;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sensor-dashboard")]
#[command(about = "Dashboard for station sensor readings and forecasts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        short,
        long,
        global = true,
        default_value = DEFAULT_CONFIG_FILE,
        help = "Configuration file (ignored if absent)"
    )]
    pub config: PathBuf,
}

#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    #[arg(short, long, help = "Sensor SQLite database")]
    pub database: Option<PathBuf>,

    #[arg(short, long, help = "Forecast Parquet file")]
    pub forecast: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the dashboard over HTTP (default)
    Serve {
        #[command(flatten)]
        inputs: InputArgs,

        #[arg(short, long, help = "Address to listen on, e.g. 127.0.0.1:8050")]
        bind: Option<String>,
    },

    /// Print a summary of the report tables without serving them
    Summary {
        #[command(flatten)]
        inputs: InputArgs,
    },
}

impl Commands {
    pub fn overrides(&self) -> SettingsOverrides {
        match self {
            Commands::Serve { inputs, bind } => SettingsOverrides {
                database_path: inputs.database.clone(),
                forecast_path: inputs.forecast.clone(),
                bind_address: bind.clone(),
            },
            Commands::Summary { inputs } => SettingsOverrides {
                database_path: inputs.database.clone(),
                forecast_path: inputs.forecast.clone(),
                bind_address: None,
            },
        }
    }
}
