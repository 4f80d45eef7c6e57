use crate::config::ConversationSettings;
use crate::context::persistence::HistoryFile;
use crate::error::Result;
use crate::llm::{Message, Role};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl From<TurnRole> for Role {
    fn from(role: TurnRole) -> Self {
        match role {
            TurnRole::User => Role::User,
            TurnRole::Assistant => Role::Assistant,
        }
    }
}

/// One message of the conversation. Fields are private so a turn cannot be
/// edited once recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Turn {
    role: TurnRole,
    content: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    timestamp: DateTime<Local>,
}

/// Accepts RFC 3339 timestamps as well as offset-less ISO 8601 ones
/// (`2024-03-09T14:05:07.123456`), which are read as local time.
fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Local>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Local));
    }
    let naive: NaiveDateTime = raw
        .parse()
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp `{raw}`: {e}")))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| serde::de::Error::custom(format!("nonexistent local time `{raw}`")))
}

impl Turn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Local::now(),
        }
    }

    pub fn role(&self) -> TurnRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn to_message(&self) -> Message {
        Message {
            role: self.role.into(),
            content: self.content.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryStats {
    pub total: usize,
    pub user: usize,
    pub assistant: usize,
    pub first: Option<DateTime<Local>>,
    pub last: Option<DateTime<Local>>,
}

/// Bounded, append-only log of turns with optional JSON persistence.
///
/// When the log grows past `max_turns` the oldest turns are dropped. With
/// auto-save on, every append rewrites the whole file; a failed write is
/// logged and the in-memory log stays authoritative.
pub struct ConversationHistory {
    turns: Vec<Turn>,
    max_turns: usize,
    store: Option<HistoryFile>,
    auto_save: bool,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self {
            turns: Vec::new(),
            max_turns: 40,
            store: None,
            auto_save: false,
        }
    }

    pub fn from_settings(settings: &ConversationSettings) -> Self {
        Self::new()
            .with_max_turns(settings.max_history_length)
            .with_store(HistoryFile::new(&settings.history_file))
            .with_auto_save(settings.auto_save_history)
    }

    pub fn with_max_turns(mut self, max: usize) -> Self {
        self.max_turns = max;
        trim_front(&mut self.turns, self.max_turns);
        self
    }

    pub fn with_store(mut self, store: HistoryFile) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_auto_save(mut self, enabled: bool) -> Self {
        self.auto_save = enabled;
        self
    }

    pub fn store(&self) -> Option<&HistoryFile> {
        self.store.as_ref()
    }

    pub fn auto_save(&self) -> bool {
        self.auto_save
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    /// Record a new turn stamped with the current time.
    pub fn append(&mut self, role: TurnRole, content: impl Into<String>) {
        self.turns.push(Turn::new(role, content));
        trim_front(&mut self.turns, self.max_turns);

        if self.auto_save {
            if let Err(e) = self.save() {
                tracing::warn!("Failed to save conversation history: {}", e);
            }
        }
    }

    /// The last `n` turns in conversation order (fewer if the log is shorter).
    pub fn window(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Replace the in-memory log with the persisted one.
    ///
    /// A missing file is an empty history. On a read or parse failure the log
    /// is reset to empty and the error returned for the caller to report.
    pub fn load(&mut self) -> Result<usize> {
        let Some(store) = &self.store else {
            return Ok(self.turns.len());
        };

        match store.load() {
            Ok(turns) => {
                self.turns = turns;
                trim_front(&mut self.turns, self.max_turns);
                tracing::info!(
                    "Loaded {} turns from {}",
                    self.turns.len(),
                    store.path().display()
                );
                Ok(self.turns.len())
            }
            Err(e) => {
                self.turns.clear();
                Err(e)
            }
        }
    }

    /// Overwrite the persisted file with the full log.
    pub fn save(&self) -> Result<()> {
        match &self.store {
            Some(store) => store.save(&self.turns),
            None => Ok(()),
        }
    }

    /// Empty the log and delete the persisted file. Callers confirm first.
    pub fn clear(&mut self) -> Result<()> {
        self.turns.clear();
        if let Some(store) = &self.store {
            store.remove()?;
            tracing::info!("Cleared conversation history at {}", store.path().display());
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn stats(&self) -> HistoryStats {
        let user = self
            .turns
            .iter()
            .filter(|t| t.role == TurnRole::User)
            .count();
        HistoryStats {
            total: self.turns.len(),
            user,
            assistant: self.turns.len() - user,
            first: self.turns.first().map(Turn::timestamp),
            last: self.turns.last().map(Turn::timestamp),
        }
    }
}

fn trim_front(turns: &mut Vec<Turn>, max: usize) {
    if turns.len() > max {
        let excess = turns.len() - max;
        turns.drain(..excess);
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new()
    }
}
