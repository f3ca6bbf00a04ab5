use super::Turn;
use super::prompts::{SYSTEM_PROMPT_FOR_CONVERSATION, mutation_prompt, retrieval_prompt};
use crate::core::error::Result;
use crate::providers::{ChatMessage, CompletionClient};
use std::sync::Arc;
use tracing::debug;

/// Which generation prompt to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Mutation,
    Retrieval,
    Conversation,
}

/// Produces a statement (or, for [`Variant::Conversation`], the answer
/// itself) from a path-specific system prompt and the latest message.
///
/// The returned text is the raw completion; it is not checked here.
#[derive(Clone)]
pub struct StatementGenerator {
    client: Arc<dyn CompletionClient>,
}

impl StatementGenerator {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    pub fn messages(variant: Variant, turn: &Turn<'_>) -> Vec<ChatMessage> {
        let system = match variant {
            Variant::Mutation => mutation_prompt(turn.user_id()),
            Variant::Retrieval => retrieval_prompt(),
            Variant::Conversation => SYSTEM_PROMPT_FOR_CONVERSATION.to_string(),
        };
        vec![ChatMessage::system(system), turn.user_message()]
    }

    pub async fn generate(&self, variant: Variant, turn: &Turn<'_>) -> Result<String> {
        let text = self.client.complete(&Self::messages(variant, turn)).await?;
        debug!(?variant, generated = %text, "generated completion");
        Ok(text)
    }
}
