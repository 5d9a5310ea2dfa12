use anyhow::{Context, Result};
use chatform_core::{ChatApiClient, ChatHistory};
use chrono::Local;
use dialoguer::{Select, theme::ColorfulTheme};
use tracing::debug;

use crate::output::print_history;

/// Chats as `(id, label)` pairs, newest date first
pub fn flatten_history(history: &ChatHistory) -> Vec<(i64, String)> {
    history
        .iter()
        .rev()
        .flat_map(|(date, chats)| {
            chats
                .iter()
                .map(move |chat| (chat.id, format!("{}  {}", date, chat.snippet)))
        })
        .collect()
}

/// Lists stored chats; with `select`, lets the user pick one and prints it.
pub async fn run_history(client: &ChatApiClient, select: bool) -> Result<()> {
    let history = client
        .list_chats()
        .await
        .context("Failed to fetch chat history")?;
    let today = Local::now().format("%Y-%m-%d").to_string();

    if !select || history.is_empty() {
        print_history(&history, &today);
        return Ok(());
    }

    let entries = flatten_history(&history);
    let labels: Vec<&str> = entries.iter().map(|(_, label)| label.as_str()).collect();
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select a chat")
        .items(&labels)
        .default(0)
        .interact_opt()
        .context("Failed to read selection")?;

    let Some(index) = choice else {
        debug!("Selection cancelled");
        return Ok(());
    };

    let chat_id = entries[index].0;
    let content = client
        .chat_content(chat_id)
        .await
        .with_context(|| format!("Failed to fetch chat {}", chat_id))?;
    println!("{}", content);
    Ok(())
}
