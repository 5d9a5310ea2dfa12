use chatform_core::{ChatOutcome, ResponseDisplay};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

use crate::output::{print_failure, print_response};

/// The response area: stdout, with a spinner while a submit is in flight.
#[derive(Default)]
pub struct TerminalDisplay {
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the spinner; the next write clears it.
    pub fn begin_request(&self) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message("Sending...");
        spinner.enable_steady_tick(Duration::from_millis(120));
        *self.spinner.lock().unwrap_or_else(|e| e.into_inner()) = Some(spinner);
    }

    fn clear_spinner(&self) {
        if let Some(spinner) = self.spinner.lock().unwrap_or_else(|e| e.into_inner()).take() {
            spinner.finish_and_clear();
        }
    }
}

impl ResponseDisplay for TerminalDisplay {
    fn set_response_text(&self, text: &str) {
        self.clear_spinner();
        print_response(text);
    }

    fn show_outcome(&self, outcome: &ChatOutcome) {
        self.clear_spinner();
        match outcome {
            ChatOutcome::Reply(text) => print_response(text),
            ChatOutcome::Failure(text) => print_failure(text),
        }
    }
}
