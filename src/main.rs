use anyhow::Context;
use clap::Parser;
use sensor_dashboard::cli::{run, Cli};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    run(cli).await.context("sensor-dashboard failed")
}
