use thiserror::Error;

/// Chat client errors
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Request Error: {0}")]
    Request(String),

    #[error("Response Error: {0}")]
    Response(String),

    #[error("Parsing Error: {0}")]
    Parsing(String),

    #[error("HTTP Error: {status_code} - {message}")]
    Http { status_code: u16, message: String },
}

impl ChatError {
    /// True when the server was never reached or its answer could not be read.
    pub fn is_transport(&self) -> bool {
        matches!(self, ChatError::Request(_) | ChatError::Response(_))
    }
}

/// Result type for chat client operations
pub type ChatResult<T> = Result<T, ChatError>;
