use chatform_core::{Appointments, ChatHistory, ClientConfig};
use colored::*;

/// Print a reply from the chat server
pub fn print_response(text: &str) {
    println!("{}: {}", "Assistant".blue().bold(), text);
}

/// Print a failure in place of a reply
pub fn print_failure(text: &str) {
    println!("{}: {}", "Error".red().bold(), text.red());
}

/// Show usage instructions when no message or action is provided
pub fn print_usage_instructions() {
    println!("{}", "Usage:".yellow().bold());
    println!("  {}", "chatform \"your message\"".green().bold());
    println!("    Submit a single message to the chat server");
    println!();
    println!("  {}", "chatform -- \"summary\"".green().bold());
    println!("    Submit text that matches a subcommand name");
    println!();
    println!("  {}", "chatform -i".green().bold());
    println!("    Keep the form open and submit every line typed");
    println!();
    println!("  {}", "chatform history [--select]".green().bold());
    println!("    List stored chats, optionally picking one to read");
    println!();
    println!("{}", "Options:".cyan());
    println!("  --base-url <URL>   Chat server address");
    println!("  --api-key <KEY>    API key sent as a bearer token");
    println!("  --help             Show this help message");
    println!();
}

/// Chat history listing, newest date first
pub fn format_history(history: &ChatHistory, today: &str) -> String {
    let mut out = String::new();
    for (date, chats) in history.iter().rev() {
        let label = if date == today {
            format!("{} (today)", date)
        } else {
            date.clone()
        };
        out.push_str(&format!("{}\n", label.bold()));
        for chat in chats {
            let id = format!("{:>4}", chat.id);
            out.push_str(&format!("  {}  {}\n", id.cyan(), chat.snippet));
        }
    }
    out
}

pub fn print_history(history: &ChatHistory, today: &str) {
    if history.is_empty() {
        println!("No stored chats.");
        return;
    }
    print!("{}", format_history(history, today));
}

pub fn print_appointments(appointments: &Appointments) {
    match appointments {
        Appointments::List(items) => {
            for item in items {
                println!("  {} {}", "•".green(), item);
            }
        }
        Appointments::None(message) => println!("{}", message),
    }
}

/// Effective configuration as TOML, with the API key masked
pub fn format_config(config: &ClientConfig) -> String {
    let mut shown = config.clone();
    if shown.api_key.is_some() {
        shown.api_key = Some("********".to_string());
    }
    toml::to_string(&shown).unwrap_or_else(|e| format!("# failed to render: {}\n", e))
}
