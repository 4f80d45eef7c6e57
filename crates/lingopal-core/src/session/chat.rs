use crate::context::Turn;
use crate::error::Result;
use crate::llm::{LlmClient, Message};
use std::sync::Arc;

/// The per-call request: system prompt, history window, new user message.
/// Rebuilt every turn and never stored.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub system_prompt: &'a str,
    pub history: &'a [Turn],
    pub user_message: &'a str,
}

impl<'a> RequestContext<'a> {
    pub fn new(system_prompt: &'a str, history: &'a [Turn], user_message: &'a str) -> Self {
        Self {
            system_prompt,
            history,
            user_message,
        }
    }

    /// System entry first, history in order, the new user message last.
    pub fn messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(Message::system(self.system_prompt));
        messages.extend(self.history.iter().map(Turn::to_message));
        messages.push(Message::user(self.user_message));
        messages
    }
}

/// Shapes completion requests and sends them through the shared transport.
/// A failed call is returned as-is; there are no retries.
#[derive(Clone)]
pub struct ChatClient {
    llm: Arc<dyn LlmClient>,
}

impl ChatClient {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn complete(
        &self,
        system_prompt: &str,
        history: &[Turn],
        user_message: &str,
    ) -> Result<String> {
        self.complete_context(&RequestContext::new(system_prompt, history, user_message))
            .await
    }

    pub async fn complete_context(&self, context: &RequestContext<'_>) -> Result<String> {
        let messages = context.messages();
        tracing::debug!(
            "Requesting completion with {} history turns",
            context.history.len()
        );
        let response = self.llm.chat(&messages).await?;
        Ok(response.message.content)
    }
}
