use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ClientConfig;
use crate::errors::{ChatError, ChatResult};
use crate::form::ChatTransport;
use crate::types::*;

/// Client for the chat server's HTTP routes
#[derive(Debug, Clone)]
pub struct ChatApiClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl ChatApiClient {
    /// Create a new client from configuration
    pub fn new(config: &ClientConfig) -> ChatResult<Self> {
        Self::with_client(Client::new(), config)
    }

    /// Create a client around an existing reqwest client
    pub fn with_client(client: Client, config: &ClientConfig) -> ChatResult<Self> {
        let mut base_url = Url::parse(config.base_url()).map_err(|e| {
            ChatError::Config(format!("Invalid base URL '{}': {}", config.base_url(), e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ChatError::Config(format!(
                "Base URL '{}' cannot carry a path",
                base_url
            )));
        }
        // Routes are joined relative to the base, so it has to end in a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL of a route
    pub fn endpoint(&self, route: &str) -> ChatResult<Url> {
        self.base_url
            .join(route)
            .map_err(|e| ChatError::Config(format!("Invalid route '{}': {}", route, e)))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> ChatResult<Response> {
        self.authorize(builder)
            .send()
            .await
            .map_err(|e| ChatError::Request(format!("Failed to send request: {}", e)))
    }

    /// Reads a companion-route answer; non-success statuses become `ChatError::Http`.
    async fn read_json<R: DeserializeOwned>(response: Response) -> ChatResult<R> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ChatError::Response(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned());
            return Err(ChatError::Http {
                status_code: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body)
            .map_err(|e| ChatError::Parsing(format!("Failed to parse response: {}", e)))
    }

    async fn get_json<R: DeserializeOwned>(&self, route: &str) -> ChatResult<R> {
        let url = self.endpoint(route)?;
        debug!(%url, "GET");
        let response = self.send(self.client.get(url)).await?;
        Self::read_json(response).await
    }

    /// Sends one message to `POST /chat`
    pub async fn chat(&self, message: &str) -> ChatResult<ServerReply> {
        self.post_message(&OutgoingPayload::new(message)).await
    }

    /// Stores a chat transcript on the server
    #[instrument(skip(self, chat))]
    pub async fn save_chat(&self, chat: &str) -> ChatResult<SaveChatResponse> {
        let url = self.endpoint("save_chat")?;
        let request = SaveChatRequest {
            chat: chat.to_string(),
        };
        let response = self.send(self.client.post(url).json(&request)).await?;
        Self::read_json(response).await
    }

    /// Stored chats grouped by date
    #[instrument(skip(self))]
    pub async fn list_chats(&self) -> ChatResult<ChatHistory> {
        self.get_json("get_chats").await
    }

    /// Full text of one stored chat
    #[instrument(skip(self))]
    pub async fn chat_content(&self, chat_id: i64) -> ChatResult<String> {
        let body: ChatContentBody = self
            .get_json(&format!("get_chat_content/{}", chat_id))
            .await?;
        Ok(body.chat_content)
    }

    /// Summary of today's chats
    #[instrument(skip(self))]
    pub async fn generate_summary(&self) -> ChatResult<String> {
        let body: SummaryBody = self.get_json("generate_summary").await?;
        Ok(body.summary)
    }

    /// Appointments found across all stored chats
    #[instrument(skip(self))]
    pub async fn find_appointments(&self) -> ChatResult<Appointments> {
        let body: AppointmentsBody = self.get_json("find_appointments").await?;
        Ok(body.appointments)
    }
}

#[async_trait]
impl ChatTransport for ChatApiClient {
    #[instrument(skip(self, payload))]
    async fn post_message(&self, payload: &OutgoingPayload) -> ChatResult<ServerReply> {
        let url = self.endpoint("chat")?;
        debug!(%url, "POST");

        let response = self.send(self.client.post(url).json(payload)).await?;

        // The status does not change how the body is read.
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ChatError::Response(format!("Failed to read response: {}", e)))?;
        let result: IncomingResult = serde_json::from_slice(&body)
            .map_err(|e| ChatError::Parsing(format!("Failed to parse response: {}", e)))?;

        debug!(status, "Chat reply parsed");
        Ok(ServerReply::new(status, result))
    }
}
