use thiserror::Error;

#[derive(Error, Debug)]
pub enum LingoError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("History error: {0}")]
    History(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LingoError {
    /// True for failures of the completion endpoint (network, status, body).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Llm(_) | Self::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, LingoError>;
