use crate::context::history::Turn;
use crate::error::LingoError;
use std::fs;
use std::path::{Path, PathBuf};

/// The history file: a pretty-printed JSON array of turns, rewritten whole
/// on every save.
#[derive(Debug, Clone)]
pub struct HistoryFile {
    path: PathBuf,
}

impl HistoryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all turns. A missing file is an empty history.
    pub fn load(&self) -> Result<Vec<Turn>, LingoError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| {
            LingoError::History(format!("Failed to read history file: {}", e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            LingoError::History(format!("Failed to parse history file: {}", e))
        })
    }

    /// Serialize all turns, replacing the previous file atomically.
    pub fn save<'a, I>(&self, turns: I) -> Result<(), LingoError>
    where
        I: IntoIterator<Item = &'a Turn>,
    {
        let turns: Vec<&Turn> = turns.into_iter().collect();
        let contents = serde_json::to_string_pretty(&turns).map_err(|e| {
            LingoError::History(format!("Failed to serialize history: {}", e))
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LingoError::History(format!("Failed to create history directory: {}", e))
            })?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, contents).map_err(|e| {
            LingoError::History(format!("Failed to write temporary history file: {}", e))
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            LingoError::History(format!("Failed to rename history file: {}", e))
        })?;

        Ok(())
    }

    pub fn remove(&self) -> Result<(), LingoError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                LingoError::History(format!("Failed to delete history file: {}", e))
            })?;
        }
        Ok(())
    }
}
