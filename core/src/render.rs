use crate::types::{ChatOutcome, IncomingResult, ServerReply};

/// Text written to the display when the reply carries neither field.
pub const ABSENT_RESULT_TEXT: &str = "undefined";

/// Text written to the display when a submit fails before a reply is parsed.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Request failed. Please try again.";

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|text| !text.is_empty())
}

impl IncomingResult {
    /// `response` when it is non-empty, else `error` when it is non-empty,
    /// else `fallback`.
    pub fn display_text<'a>(&'a self, fallback: &'a str) -> &'a str {
        non_empty(&self.response)
            .or_else(|| non_empty(&self.error))
            .unwrap_or(fallback)
    }
}

impl ChatOutcome {
    /// Tags a reply by its HTTP status. The text follows the same rule as
    /// [`render_result`] either way.
    pub fn from_reply(reply: &ServerReply, fallback: &str) -> Self {
        let text = reply.result.display_text(fallback).to_string();
        if reply.is_success() {
            ChatOutcome::Reply(text)
        } else {
            ChatOutcome::Failure(text)
        }
    }
}

/// Display text for a parsed `/chat` body.
pub fn render_result(result: &IncomingResult) -> String {
    result.display_text(ABSENT_RESULT_TEXT).to_string()
}
