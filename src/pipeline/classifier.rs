use super::prompts::SYSTEM_PROMPT_FOR_CLASSIFICATION;
use super::{Category, Turn};
use crate::core::error::Result;
use crate::providers::{ChatMessage, CompletionClient};
use std::sync::Arc;
use tracing::debug;

/// Maps a conversation turn to a [`Category`] with one completion call.
#[derive(Clone)]
pub struct Classifier {
    client: Arc<dyn CompletionClient>,
}

impl Classifier {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Build the classification conversation: the fixed instruction, the
    /// preceding messages, then the latest message.
    pub fn messages(turn: &Turn<'_>) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(turn.history().len() + 2);
        messages.push(ChatMessage::system(SYSTEM_PROMPT_FOR_CLASSIFICATION));
        messages.extend(turn.history().iter().cloned());
        messages.push(turn.user_message());
        messages
    }

    pub async fn classify(&self, turn: &Turn<'_>) -> Result<Category> {
        let raw = self.client.complete(&Self::messages(turn)).await?;
        let label = raw.trim();
        let category = Category::parse(label);
        debug!(raw = label, %category, "classification result");
        Ok(category)
    }
}
