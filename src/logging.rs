use std::fs::File;
use std::sync::Mutex;

use color_eyre::eyre::eyre;
use tracing_subscriber::EnvFilter;

use crate::cli::Config;

const DEFAULT_DIRECTIVE: &str = "noteboard=info";

/// Sends logs to a file; the terminal itself belongs to the UI.
pub fn init(config: &Config) -> color_eyre::Result<()> {
    let file = File::create(&config.log_file)?;
    let filter = build_filter(config.log_level.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| eyre!(e))?;

    tracing::info!(log_file = %config.log_file.display(), "logging initialised");
    Ok(())
}

fn build_filter(directive: Option<&str>) -> color_eyre::Result<EnvFilter> {
    Ok(match directive {
        Some(directive) => EnvFilter::try_new(directive)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE)),
    })
}
