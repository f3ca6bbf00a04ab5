use crate::core::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One role-tagged entry of a conversation.
///
/// Messages are immutable once built; a conversation is an ordered slice of
/// them, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    role: Role,
    content: String,
    #[serde(rename = "userId", default)]
    user_id: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            user_id: user_id.into(),
        }
    }

    /// System messages carry no caller identity.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content, "")
    }

    pub fn user(content: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::new(Role::User, content, user_id)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// A remote chat-completion endpoint, seen as an opaque function from a
/// conversation to the text of its first choice.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

pub mod base_client;
pub mod openai_style;
