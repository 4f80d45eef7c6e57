use crate::context::system_prompt::TranslationPrompt;
use crate::session::chat::ChatClient;

/// Sentinel returned when the translation call fails.
pub const TRANSLATION_FAILED: &str = "翻译失败";

/// Best-effort translation through the chat transport. Stateless: no
/// conversation history is attached, and failures become a sentinel string.
#[derive(Clone)]
pub struct TranslationClient {
    chat: ChatClient,
    prompt: TranslationPrompt,
}

impl TranslationClient {
    pub fn new(chat: ChatClient) -> Self {
        Self {
            chat,
            prompt: TranslationPrompt::default(),
        }
    }

    pub fn with_prompt(mut self, prompt: TranslationPrompt) -> Self {
        self.prompt = prompt;
        self
    }

    pub async fn translate(&self, source_text: &str) -> String {
        let system = self.prompt.system();
        let request = self.prompt.user(source_text);
        match self.chat.complete(&system, &[], &request).await {
            Ok(translated) => translated,
            Err(e) => {
                tracing::warn!("Translation failed: {}", e);
                TRANSLATION_FAILED.to_string()
            }
        }
    }
}
