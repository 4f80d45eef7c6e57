//! Keyword content policy.
//!
//! This is a plain case-insensitive substring match, not semantic moderation.
//! "drugstore" is blocked by the keyword "drug"; paraphrases are not caught.

use crate::config::FilterSettings;

/// Decides whether user input may be forwarded to the model.
pub trait ContentPolicy: Send + Sync {
    fn is_blocked(&self, text: &str) -> bool;

    /// Canned English reply used instead of a completion for blocked input.
    fn redirect_message(&self) -> &str;

    /// Counterpart of [`redirect_message`](Self::redirect_message) in the translation language.
    fn redirect_message_translated(&self) -> &str;
}

#[derive(Debug, Clone)]
pub struct KeywordFilter {
    /// Lowercased, blank entries removed.
    keywords: Vec<String>,
    redirect_message: String,
    redirect_message_translated: String,
}

impl KeywordFilter {
    pub fn new<I, S>(keywords: I, redirect_message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            redirect_message: redirect_message.into(),
            redirect_message_translated: String::new(),
        }
    }

    pub fn from_settings(settings: &FilterSettings) -> Self {
        Self::new(&settings.inappropriate_keywords, settings.redirect_message.clone())
            .with_translated_redirect(settings.redirect_message_translated.clone())
    }

    pub fn with_translated_redirect(mut self, message: impl Into<String>) -> Self {
        self.redirect_message_translated = message.into();
        self
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// First keyword found in `text`, if any.
    pub fn matched_keyword(&self, text: &str) -> Option<&str> {
        if text.is_empty() {
            return None;
        }
        let folded = text.to_lowercase();
        self.keywords
            .iter()
            .find(|k| folded.contains(k.as_str()))
            .map(String::as_str)
    }
}

impl ContentPolicy for KeywordFilter {
    fn is_blocked(&self, text: &str) -> bool {
        self.matched_keyword(text).is_some()
    }

    fn redirect_message(&self) -> &str {
        &self.redirect_message
    }

    fn redirect_message_translated(&self) -> &str {
        &self.redirect_message_translated
    }
}
