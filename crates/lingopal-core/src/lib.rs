pub mod error;
pub mod llm;
pub mod policy;
pub mod context;
pub mod config;
pub mod session;

// Re-export key types
pub use error::LingoError;
pub use llm::{LlmClient, LlmResponse, Message, OpenAIClient, Role};
pub use policy::{ContentPolicy, KeywordFilter};
pub use context::{ConversationHistory, HistoryFile, HistoryStats, Turn, TurnRole};
pub use config::Settings;
pub use session::{ChatClient, Session, TranslationClient, TurnOutcome, TurnReply, TurnState};
