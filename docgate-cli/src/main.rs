use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::warn;

use docgate_cli::cli::{Cli, Commands};
use docgate_cli::commands;
use docgate_cli::error::CliError;
use docgate_cli::logging;
use docgate_cli::output::OutputWriter;
use docgate_core::config::{DocgateConfig, GeneralConfig};
use docgate_core::error::{ConfigError, DocgateError};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let loaded = load_config(&cli.config).await;

    let mut general = match &loaded {
        Ok((config, _)) => config.general.clone(),
        Err(_) => GeneralConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        general.log_level = level.clone();
    }
    logging::init_tracing(&general).map_err(|e| CliError::Config(e.to_string()))?;
    docgate_core::metrics::describe_all();

    if let Ok((_, false)) = &loaded {
        warn!(path = %cli.config.display(), "config file not found, using defaults");
    }

    let writer = OutputWriter::new(cli.output);
    match cli.command {
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
        Commands::Search(args) => {
            let (config, _) = loaded?;
            commands::search::execute(args, &config, &writer).await
        }
        Commands::Check(args) => {
            let (config, _) = loaded?;
            commands::check::execute(args, &config, &writer).await
        }
    }
}

/// Loads the config file; a missing file falls back to defaults plus env overrides.
///
/// The flag in the result is `false` when the defaults were used.
async fn load_config(path: &Path) -> Result<(DocgateConfig, bool), CliError> {
    match DocgateConfig::load(path).await {
        Ok(config) => Ok((config, true)),
        Err(DocgateError::Config(ConfigError::FileNotFound { .. })) => {
            let mut config = DocgateConfig::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok((config, false))
        }
        Err(e) => Err(e.into()),
    }
}
