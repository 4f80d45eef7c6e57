use crate::config::OpenAiSettings;
use crate::error::LingoError;
use crate::llm::traits::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for OpenAI-compatible `/chat/completions` endpoints.
pub struct OpenAIClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_url: String,
    max_tokens: u32,
    temperature: f32,
    timeout: Duration,
}

impl OpenAIClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: "gpt-4o-mini".to_string(),
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn from_settings(settings: &OpenAiSettings) -> Self {
        Self::new(settings.api_key.clone())
            .with_model(settings.model.clone())
            .with_api_url(settings.api_url.clone())
            .with_generation(settings.max_tokens, settings.temperature)
            .with_timeout(Duration::from_secs(settings.timeout))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Full endpoint URL, including the `/chat/completions` path.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_generation(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[async_trait::async_trait]
impl LlmClient for OpenAIClient {
    async fn chat(&self, messages: &[Message]) -> Result<LlmResponse, LingoError> {
        let request_body = OpenAIRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            stream: false,
        };

        tracing::debug!(
            "POST {} model={} messages={}",
            self.api_url,
            self.model,
            messages.len()
        );

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(self.timeout)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(LingoError::Llm(format!(
                "API error ({}): {}",
                status, response_text
            )));
        }

        let api_response: OpenAIResponse = serde_json::from_str(&response_text)
            .map_err(|e| LingoError::Llm(format!("Failed to parse response: {e}")))?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LingoError::Llm("No response from API".into()))?;

        let content = choice
            .message
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| LingoError::Llm("Empty reply from API".into()))?;

        Ok(LlmResponse {
            message: Message::assistant(content),
        })
    }
}
