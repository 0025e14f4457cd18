use crate::analyzers::describe_context;
use crate::cli::args::{Cli, Commands, InputArgs};
use crate::config::Settings;
use crate::error::Result;
use crate::processors::{ReportBuilder, ReportContext};
use crate::server;
use crate::utils::progress::ProgressReporter;
use tracing::info;

pub async fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Serve {
        inputs: InputArgs::default(),
        bind: None,
    });

    let settings = Settings::load(Some(cli.config.as_path()), &command.overrides())?;
    info!(
        "Using database {} and forecast {}",
        settings.database_path().display(),
        settings.forecast_path().display()
    );

    let progress = startup_progress(cli.verbose);

    match command {
        Commands::Serve { .. } => {
            let context = build_context(&settings, &progress).await?;
            server::serve(context, settings.bind_address).await?;
        }

        Commands::Summary { .. } => {
            let context = build_context(&settings, &progress).await?;
            println!("{}", describe_context(&context));
        }
    }

    Ok(())
}

/// Both commands show the spinner while loading. Debug logs would interleave
/// with it, so verbose runs stay silent.
fn startup_progress(verbose: bool) -> ProgressReporter {
    ProgressReporter::new_spinner("Building report tables...", verbose)
}

async fn build_context(settings: &Settings, progress: &ProgressReporter) -> Result<ReportContext> {
    ReportBuilder::new(settings.database_path(), settings.forecast_path())
        .build(Some(progress))
        .await
}
