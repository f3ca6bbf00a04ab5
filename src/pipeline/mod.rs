//! The classify-then-dispatch pipeline.

pub mod category;
pub mod classifier;
pub mod dispatcher;
pub mod formatter;
pub mod generator;
pub mod guard;
pub mod prompts;

pub use category::Category;
pub use dispatcher::Dispatcher;

use crate::providers::ChatMessage;

/// The active request inside a conversation: its last message, plus
/// everything before it.
#[derive(Debug, Clone, Copy)]
pub struct Turn<'a> {
    history: &'a [ChatMessage],
    latest: &'a ChatMessage,
}

impl<'a> Turn<'a> {
    /// `None` for an empty conversation.
    pub fn from_conversation(messages: &'a [ChatMessage]) -> Option<Self> {
        messages
            .split_last()
            .map(|(latest, history)| Turn { history, latest })
    }

    pub fn history(&self) -> &'a [ChatMessage] {
        self.history
    }

    pub fn content(&self) -> &'a str {
        self.latest.content()
    }

    pub fn user_id(&self) -> &'a str {
        self.latest.user_id()
    }

    /// The latest message re-tagged as a user message.
    pub fn user_message(&self) -> ChatMessage {
        ChatMessage::user(self.content(), self.user_id())
    }
}
