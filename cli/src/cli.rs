use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Terminal client for the chat server
#[derive(Parser, Debug)]
#[command(name = "chatform", author, version, about, long_about = None)]
pub struct Args {
    /// The message to submit. Put it after `--` when it matches a subcommand name
    #[arg(index = 1)] // Positional argument
    pub message: Option<String>,

    /// Keep the form open and submit every line typed
    #[arg(short, long, default_value_t = false)]
    pub interactive: bool,

    /// Base URL of the chat server
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// API key sent as a bearer token
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Path to the configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, default_value_t = false, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Store a chat transcript on the server
    Save {
        /// Transcript text
        text: String,
    },

    /// List stored chats grouped by date
    History {
        /// Pick a chat from the list and print it
        #[arg(short, long, default_value_t = false)]
        select: bool,
    },

    /// Print the full text of a stored chat
    Show {
        /// Chat id, as listed by `history`
        id: i64,
    },

    /// Summarize today's chats
    Summary,

    /// List appointments found in the stored chats
    Appointments,

    /// Print the effective configuration
    Config {
        /// Also write it to the configuration file
        #[arg(long, default_value_t = false)]
        save: bool,
    },
}
