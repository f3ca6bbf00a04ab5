use crate::config::CompletionSettings;
use crate::core::error::{ChatError, Result};
use crate::providers::base_client::HttpClient;
use crate::providers::{ChatMessage, CompletionClient};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionMessage<'a>>,
    max_tokens: u32,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatCompletionMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

/// Completion client for OpenAI-compatible `chat/completions` endpoints.
#[derive(Clone)]
pub struct OpenAIStyleClient {
    client: HttpClient,
    model: String,
    max_tokens: u32,
    temperature: Option<f32>,
}

impl OpenAIStyleClient {
    pub fn new(settings: &CompletionSettings) -> Result<Self> {
        let headers = (!settings.headers.is_empty()).then(|| settings.headers.clone());
        Ok(Self {
            client: HttpClient::new(settings.endpoint.clone(), settings.token.clone(), headers)?,
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAIStyleClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        debug!(
            endpoint = self.client.endpoint(),
            conversation = ?messages,
            "chat query"
        );

        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| ChatCompletionMessage {
                    role: m.role().as_str(),
                    content: m.content(),
                })
                .collect(),
            max_tokens: self.max_tokens,
            stream: false,
            temperature: self.temperature,
        };

        let response = self.client.post(&payload).await?;
        let response_body = response.text().await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&response_body)
            .map_err(|e| ChatError::Upstream(format!("Unexpected response shape: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ChatError::Upstream("No message content in API response".to_string()))
    }
}
