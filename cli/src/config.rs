use anyhow::{Context, Result};
use chatform_core::config::{get_default_config_file, ClientConfig, APP_NAME};
use std::path::PathBuf;

use crate::cli::Args;

/// File the configuration is read from and saved to
pub fn config_path(args: &Args) -> Result<PathBuf> {
    match &args.config {
        Some(path) => Ok(path.clone()),
        None => get_default_config_file(APP_NAME).context("Failed to locate the config file"),
    }
}

/// Values given on the command line
pub fn overrides(args: &Args) -> ClientConfig {
    ClientConfig {
        base_url: args.base_url.clone(),
        api_key: args.api_key.clone(),
        log_level: args.verbose.then(|| "debug".to_string()),
        ..ClientConfig::default()
    }
}

/// Defaults, config file, environment, then command-line flags
pub fn resolve(args: &Args) -> Result<ClientConfig> {
    let path = config_path(args)?;
    let loaded = ClientConfig::load(Some(path.as_path()))
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    Ok(loaded.merge(&overrides(args)))
}
