use crate::error::LingoError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One entry of a chat-completion request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub message: Message,
}

/// The transport seam for chat completions. One call, one reply, no streaming.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Send the message list and return the first candidate reply.
    async fn chat(&self, messages: &[Message]) -> Result<LlmResponse, LingoError>;
}
