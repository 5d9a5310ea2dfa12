use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

use crate::errors::ChatResult;
use crate::render::{ABSENT_RESULT_TEXT, DEFAULT_FAILURE_MESSAGE};
use crate::types::{ChatOutcome, OutgoingPayload, ServerReply};

/// The network step of a submit
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Posts the payload to the chat route and parses whatever comes back,
    /// whatever the status.
    async fn post_message(&self, payload: &OutgoingPayload) -> ChatResult<ServerReply>;
}

/// Where the message text is read from at submit time
pub trait MessageSource: Send + Sync {
    fn message(&self) -> String;
}

/// Where the display text is written
pub trait ResponseDisplay: Send + Sync {
    /// Replaces the whole displayed text.
    fn set_response_text(&self, text: &str);

    fn show_outcome(&self, outcome: &ChatOutcome) {
        self.set_response_text(outcome.text());
    }
}

impl<S: MessageSource + ?Sized> MessageSource for Arc<S> {
    fn message(&self) -> String {
        (**self).message()
    }
}

impl<D: ResponseDisplay + ?Sized> ResponseDisplay for Arc<D> {
    fn set_response_text(&self, text: &str) {
        (**self).set_response_text(text)
    }

    fn show_outcome(&self, outcome: &ChatOutcome) {
        (**self).show_outcome(outcome)
    }
}

/// A submit notification. The default action runs unless it is prevented.
#[derive(Debug, Default)]
pub struct SubmitEvent {
    default_prevented: AtomicBool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&self) {
        self.default_prevented.store(true, Ordering::SeqCst);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.load(Ordering::SeqCst)
    }
}

/// In-memory message field
#[derive(Debug, Default)]
pub struct TextField {
    value: Mutex<String>,
}

impl TextField {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(value.into()),
        }
    }

    pub fn set_value(&self, value: impl Into<String>) {
        *self.value.lock().unwrap_or_else(|e| e.into_inner()) = value.into();
    }
}

impl MessageSource for TextField {
    fn message(&self) -> String {
        self.value.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// In-memory response area. Keeps the current text and counts writes.
#[derive(Debug, Default)]
pub struct TextArea {
    text: Mutex<String>,
    writes: AtomicUsize,
}

impl TextArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with some previous content, as a page would.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Mutex::new(text.into()),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn text(&self) -> String {
        self.text.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl ResponseDisplay for TextArea {
    fn set_response_text(&self, text: &str) {
        let mut current = self.text.lock().unwrap_or_else(|e| e.into_inner());
        *current = text.to_string();
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Reads the message field, posts it and writes the reply into the display.
///
/// Submits do not coordinate: concurrent calls race, and whichever reply
/// completes last owns the display.
pub struct ChatSubmitHandler<T, S, D> {
    transport: T,
    source: S,
    display: D,
    failure_message: String,
    absent_text: String,
}

impl<T, S, D> ChatSubmitHandler<T, S, D>
where
    T: ChatTransport,
    S: MessageSource,
    D: ResponseDisplay,
{
    pub fn new(transport: T, source: S, display: D) -> Self {
        Self {
            transport,
            source,
            display,
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
            absent_text: ABSENT_RESULT_TEXT.to_string(),
        }
    }

    /// Text shown when the request fails or the reply cannot be parsed
    pub fn with_failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = message.into();
        self
    }

    /// Text shown when the reply has neither `response` nor `error`
    pub fn with_absent_text(mut self, text: impl Into<String>) -> Self {
        self.absent_text = text.into();
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Handles one submit event.
    ///
    /// The event's default action is prevented before anything else. On
    /// failure the display shows the failure message and the error is
    /// returned.
    #[instrument(skip(self, event))]
    pub async fn on_submit(&self, event: &SubmitEvent) -> ChatResult<ChatOutcome> {
        event.prevent_default();

        let payload = OutgoingPayload::new(self.source.message());
        debug!(len = payload.message.len(), "Submitting chat message");

        match self.transport.post_message(&payload).await {
            Ok(reply) => {
                let outcome = ChatOutcome::from_reply(&reply, &self.absent_text);
                if outcome.is_failure() {
                    info!(status = reply.status, "Chat server reported a failure");
                } else {
                    debug!(status = reply.status, "Chat reply received");
                }
                self.display.show_outcome(&outcome);
                Ok(outcome)
            }
            Err(e) => {
                if e.is_transport() {
                    warn!(error = %e, "Chat request did not complete");
                } else {
                    warn!(error = %e, "Chat reply could not be parsed");
                }
                self.display
                    .show_outcome(&ChatOutcome::Failure(self.failure_message.clone()));
                Err(e)
            }
        }
    }
}
