mod history;
pub mod persistence;
pub mod export;
pub mod system_prompt;

pub use history::{ConversationHistory, HistoryStats, Turn, TurnRole};
pub use persistence::HistoryFile;
pub use export::{default_export_path, export_transcript, render_transcript};
