/// System prompt for the conversation partner.
pub const TUTOR_SYSTEM_PROMPT: &str = "\
You are a helpful and positive English conversation AI assistant.

IMPORTANT RULES:
1. ALWAYS respond in ENGLISH ONLY - never use any other language
2. Keep all content POSITIVE, UPLIFTING, and EDUCATIONAL
3. STRICTLY FORBIDDEN: pornography, gambling, drugs, violence, hate speech, or any illegal content
4. Focus on helpful topics like: learning English, personal development, positive thinking, \
education, hobbies, travel, culture, science, technology, health, and motivation
5. Be encouraging, supportive, and inspiring in your responses
6. If someone asks about inappropriate topics, politely redirect to positive alternatives
7. Maintain a warm, friendly, and professional tone
8. Help users improve their English skills through natural conversation

Start every response with a warm greeting and maintain engaging conversation.";

/// Prompts for the one-shot translation request.
#[derive(Debug, Clone)]
pub struct TranslationPrompt {
    target_language: String,
}

impl TranslationPrompt {
    pub fn new(target_language: impl Into<String>) -> Self {
        Self {
            target_language: target_language.into(),
        }
    }

    /// Display name for a UI language tag such as `zh-CN`.
    pub fn from_language_tag(tag: &str) -> Self {
        let name = match tag.to_ascii_lowercase().as_str() {
            "zh" | "zh-cn" | "zh-hans" => "Chinese (Simplified)",
            "zh-tw" | "zh-hant" => "Chinese (Traditional)",
            "ja" | "ja-jp" => "Japanese",
            "ko" | "ko-kr" => "Korean",
            "es" => "Spanish",
            "fr" => "French",
            "de" => "German",
            _ => tag,
        };
        Self::new(name)
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    pub fn system(&self) -> String {
        format!(
            "You are a professional English to {lang} translator. Provide only the {lang} translation.",
            lang = self.target_language
        )
    }

    pub fn user(&self, english_text: &str) -> String {
        format!(
            "Please translate the following English text to {}.\n\
             Only provide the translation, no explanations:\n\n{}",
            self.target_language, english_text
        )
    }
}

impl Default for TranslationPrompt {
    fn default() -> Self {
        Self::new("Chinese (Simplified)")
    }
}
