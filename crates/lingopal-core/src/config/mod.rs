use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::{LingoError, Result};

pub const CONFIG_FILE_NAME: &str = "config.json";

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_API_URL: &str = "OPENAI_API_URL";
pub const ENV_MODEL: &str = "OPENAI_MODEL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub openai: OpenAiSettings,
    pub conversation: ConversationSettings,
    pub filter: FilterSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationSettings {
    pub max_history_length: usize,
    /// Conversational exchanges sent as context; the window is twice this many turns.
    pub recent_history_count: usize,
    pub enable_translation: bool,
    pub auto_save_history: bool,
    pub history_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub inappropriate_keywords: Vec<String>,
    pub redirect_message: String,
    pub redirect_message_translated: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub show_english: bool,
    pub show_chinese: bool,
    pub show_timestamps: bool,
    pub language: String,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            timeout: 30,
        }
    }
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            max_history_length: 40,
            recent_history_count: 10,
            enable_translation: true,
            auto_save_history: true,
            history_file: PathBuf::from("conversation_history.json"),
        }
    }
}

impl Default for FilterSettings {
    fn default() -> Self {
        let keywords = [
            "黄", "赌", "毒", "色情", "暴力", "赌博", "吸毒", "违法",
            "porn", "gambling", "drugs", "violence", "illegal",
        ];
        Self {
            inappropriate_keywords: keywords.iter().map(|k| k.to_string()).collect(),
            redirect_message: "I'm sorry, but I cannot discuss inappropriate or illegal topics. \
                Let's focus on something positive and constructive instead. \
                What would you like to learn about today?"
                .to_string(),
            redirect_message_translated:
                "抱歉，我不能讨论不当或违法的话题。让我们专注于积极和建设性的事情吧。您今天想了解什么？"
                    .to_string(),
        }
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            show_english: true,
            show_chinese: true,
            show_timestamps: false,
            language: "zh-CN".to_string(),
        }
    }
}

impl Settings {
    /// Resolve the config file: an explicit path wins, then `./config.json`,
    /// then the platform config directory.
    pub fn config_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return local;
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lingopal")
            .join(CONFIG_FILE_NAME)
    }

    /// Load settings for the process: file merged over defaults, then
    /// environment overrides. Never fails; problems are logged.
    pub fn load(explicit: Option<&Path>) -> Self {
        let mut settings = Self::load_from(&Self::config_path(explicit));
        settings.apply_overrides(|key| std::env::var(key).ok());
        if settings.openai.api_key.is_empty() {
            tracing::warn!("No API key configured; set {} or openai.api_key", ENV_API_KEY);
        }
        settings
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Self::default();
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json_str(&content) {
            Ok(settings) => {
                tracing::info!("Loaded configuration from {}", path.display());
                settings
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Merge a JSON document over the defaults section by section. A section
    /// that fails to deserialize keeps its defaults; unknown keys are ignored.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(content)?;
        let Value::Object(sections) = root else {
            return Err(LingoError::Config(
                "top-level config value must be a JSON object".to_string(),
            ));
        };

        let mut settings = Self::default();
        for (key, value) in sections {
            match key.strip_suffix("_config").unwrap_or(key.as_str()) {
                "openai" => merge_section(&mut settings.openai, value, &key),
                "conversation" => merge_section(&mut settings.conversation, value, &key),
                "filter" => merge_section(&mut settings.filter, value, &key),
                "ui" => merge_section(&mut settings.ui, value, &key),
                _ => tracing::debug!("Ignoring unknown config section `{}`", key),
            }
        }
        Ok(settings)
    }

    /// Apply `OPENAI_API_KEY`, `OPENAI_API_URL` and `OPENAI_MODEL` from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(key) = non_empty(ENV_API_KEY) {
            self.openai.api_key = key;
        }
        if let Some(url) = non_empty(ENV_API_URL) {
            self.openai.api_url = url;
        }
        if let Some(model) = non_empty(ENV_MODEL) {
            self.openai.model = model;
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn merge_section<T: DeserializeOwned>(slot: &mut T, value: Value, name: &str) {
    match serde_json::from_value::<T>(value) {
        Ok(section) => *slot = section,
        Err(e) => tracing::warn!("Malformed `{}` config section, keeping defaults: {}", name, e),
    }
}
