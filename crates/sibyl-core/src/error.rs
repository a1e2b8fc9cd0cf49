use thiserror::Error;

#[derive(Error, Debug)]
pub enum SibylError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error ({topic}): {message}")]
    Configuration { topic: String, message: String },

    #[error("No thematic network could be trained")]
    NoNetworksAvailable,

    #[error("Aggregation error: {0}")]
    Aggregation(String),

    #[error("Source error: {0}")]
    Source(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SibylError {
    pub fn configuration(topic: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            topic: topic.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SibylError>;
