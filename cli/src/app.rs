use anyhow::{Context, Result};
use chatform_core::{
    ChatApiClient, ChatOutcome, ChatResult, ChatSubmitHandler, ClientConfig, SubmitEvent,
    TextField,
};
use colored::*;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::{debug, info};

use crate::cli::{Args, Command};
use crate::config::config_path;
use crate::history::run_history;
use crate::output::{format_config, print_appointments};
use crate::terminal::TerminalDisplay;

pub type FormHandler = ChatSubmitHandler<ChatApiClient, Arc<TextField>, Arc<TerminalDisplay>>;

/// Binds the message field and the terminal display to the client
pub fn build_handler(client: ChatApiClient, config: &ClientConfig, field: Arc<TextField>) -> FormHandler {
    ChatSubmitHandler::new(client, field, Arc::new(TerminalDisplay::new()))
        .with_failure_message(config.failure_message())
        .with_absent_text(config.absent_text())
}

/// Drops the line terminator and nothing else
pub fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

pub fn is_exit_command(line: &str) -> bool {
    matches!(line, "/exit" | "/quit")
}

async fn submit(handler: &FormHandler) -> ChatResult<ChatOutcome> {
    handler.display().begin_request();
    handler.on_submit(&SubmitEvent::new()).await
}

/// Submits one message. Returns whether the server answered with a success status.
pub async fn run_single_query(message: String, client: ChatApiClient, config: &ClientConfig) -> Result<bool> {
    info!("Submitting single message");
    let handler = build_handler(client, config, Arc::new(TextField::new(message)));

    let outcome = submit(&handler)
        .await
        .context("Failed to submit message")?;
    Ok(!outcome.is_failure())
}

/// Keeps the form open, submitting every line read from stdin
pub async fn run_interactive_chat(client: ChatApiClient, config: &ClientConfig) -> Result<()> {
    println!("Connected to {}.", client.base_url());
    println!("Type /exit or /quit to leave.");
    println!();

    let field = Arc::new(TextField::default());
    let handler = build_handler(client, config, field.clone());
    let stdin = io::stdin();

    loop {
        print!("{}: ", "You".green().bold());
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut input = String::new();
        let read = stdin
            .lock()
            .read_line(&mut input)
            .context("Failed to read input")?;
        if read == 0 {
            println!();
            break;
        }

        let line = strip_line_ending(&input);
        if is_exit_command(line) {
            println!("Closing the form.");
            break;
        }

        field.set_value(line);
        // Failures are already on the display.
        if let Err(e) = submit(&handler).await {
            debug!(error = %e, "Submit failed");
        }
        println!();
    }

    Ok(())
}

/// Builds the HTTP client for the configured server
pub fn connect(config: &ClientConfig) -> Result<ChatApiClient> {
    ChatApiClient::new(config).context("Failed to initialize chat client")
}

/// Runs one of the subcommands
pub async fn run_command(command: &Command, args: &Args, config: &ClientConfig) -> Result<()> {
    match command {
        Command::Save { text } => {
            let saved = connect(config)?
                .save_chat(text)
                .await
                .context("Failed to save chat")?;
            println!("{}", saved.status);
        }
        Command::History { select } => run_history(&connect(config)?, *select).await?,
        Command::Show { id } => {
            let content = connect(config)?
                .chat_content(*id)
                .await
                .with_context(|| format!("Failed to fetch chat {}", id))?;
            println!("{}", content);
        }
        Command::Summary => {
            let summary = connect(config)?
                .generate_summary()
                .await
                .context("Failed to generate summary")?;
            println!("{}", summary);
        }
        Command::Appointments => {
            let appointments = connect(config)?
                .find_appointments()
                .await
                .context("Failed to find appointments")?;
            print_appointments(&appointments);
        }
        Command::Config { save } => run_config(args, config, *save)?,
    }
    Ok(())
}

/// Prints the effective configuration, optionally saving it
pub fn run_config(args: &Args, config: &ClientConfig, save: bool) -> Result<()> {
    print!("{}", format_config(config));
    if save {
        let path = config_path(args)?;
        config
            .save_to_file(&path)
            .with_context(|| format!("Failed to save configuration to {}", path.display()))?;
        println!("{} {}", "Saved to".green(), path.display());
    }
    Ok(())
}
