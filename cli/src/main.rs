use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::info;

mod app;
mod cli;
mod config;
mod history;
mod logging;
mod output;
mod terminal;

use crate::cli::Args;
use crate::logging::log_error;
use crate::output::print_usage_instructions;

/// Main function - Resolves configuration and submits to the chat server
#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env before the configuration reads the environment
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = config::resolve(&args)?;

    logging::init(config.log_level());
    info!(base_url = config.base_url(), "Using chat server");

    if let Some(command) = &args.command {
        if let Err(e) = app::run_command(command, &args, &config).await {
            log_error(&format!("{:#}", e));
            return Ok(ExitCode::FAILURE);
        }
        return Ok(ExitCode::SUCCESS);
    }

    if args.interactive {
        let client = app::connect(&config)?;
        app::run_interactive_chat(client, &config).await?;
    } else if let Some(message) = args.message.clone() {
        let client = app::connect(&config)?;
        match app::run_single_query(message, client, &config).await {
            Ok(true) => {}
            Ok(false) => return Ok(ExitCode::FAILURE),
            Err(e) => {
                // The display already shows the failure message
                log_error(&format!("{:#}", e));
                return Ok(ExitCode::FAILURE);
            }
        }
    } else {
        print_usage_instructions();
    }

    Ok(ExitCode::SUCCESS)
}
