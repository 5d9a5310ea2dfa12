use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of a `POST /chat` request
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OutgoingPayload {
    /// The message field's value, verbatim
    pub message: String,
}

impl OutgoingPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of a `/chat` response. Either field may be missing or `null`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomingResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IncomingResult {
    pub fn response(text: impl Into<String>) -> Self {
        Self {
            response: Some(text.into()),
            error: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            response: None,
            error: Some(text.into()),
        }
    }
}

/// A parsed `/chat` body together with the status it arrived with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerReply {
    pub status: u16,
    pub result: IncomingResult,
}

impl ServerReply {
    pub fn new(status: u16, result: IncomingResult) -> Self {
        Self { status, result }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outcome of one submit, tagged by the server's HTTP status.
///
/// The carried text is what gets displayed in both cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    Reply(String),
    Failure(String),
}

impl ChatOutcome {
    pub fn text(&self) -> &str {
        match self {
            ChatOutcome::Reply(text) | ChatOutcome::Failure(text) => text,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ChatOutcome::Failure(_))
    }
}

/// Body of a `POST /save_chat` request
#[derive(Serialize, Debug, Clone)]
pub struct SaveChatRequest {
    pub chat: String,
}

/// Successful `/save_chat` answer
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SaveChatResponse {
    pub status: String,
}

/// One entry of the chat history listing
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatSnippet {
    pub id: i64,
    pub snippet: String,
}

/// Stored chats grouped by their `YYYY-MM-DD` date
pub type ChatHistory = BTreeMap<String, Vec<ChatSnippet>>;

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct ChatContentBody {
    pub chat_content: String,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct SummaryBody {
    pub summary: String,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct AppointmentsBody {
    pub appointments: Appointments,
}

/// Appointments extracted from stored chats.
///
/// The server answers with a plain message when it finds nothing.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Appointments {
    List(Vec<String>),
    None(String),
}

/// Error body shared by all routes
#[derive(Deserialize, Debug, Clone, Default)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
