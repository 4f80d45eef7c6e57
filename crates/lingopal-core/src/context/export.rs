use crate::context::history::{Turn, TurnRole};
use crate::error::Result;
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

const TRANSCRIPT_TITLE: &str = "Lingopal - Conversation Transcript";

/// `conversation_export_YYYYMMDD_HHMMSS.txt` in the working directory.
pub fn default_export_path(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!(
        "conversation_export_{}.txt",
        now.format("%Y%m%d_%H%M%S")
    ))
}

pub fn render_transcript(turns: &[Turn], show_timestamps: bool) -> String {
    let mut out = String::new();
    out.push_str(TRANSCRIPT_TITLE);
    out.push('\n');
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");

    for turn in turns {
        if show_timestamps {
            let _ = write!(out, "[{}] ", turn.timestamp().to_rfc3339());
        }
        let speaker = match turn.role() {
            TurnRole::User => "You",
            TurnRole::Assistant => "AI",
        };
        let _ = writeln!(out, "{speaker}: {}", turn.content());
        out.push('\n');
    }
    out
}

pub fn export_transcript(turns: &[Turn], path: &Path, show_timestamps: bool) -> Result<()> {
    std::fs::write(path, render_transcript(turns, show_timestamps))?;
    tracing::info!("Exported {} turns to {}", turns.len(), path.display());
    Ok(())
}
