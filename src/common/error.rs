use thiserror::Error;

/// Failures raised while turning a raw source payload into a `RecordSet`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IngestError {
    /// One item could not be normalized. Ingestion skips it and continues.
    #[error("Malformed item #{index}: {reason}")]
    MalformedItem { index: usize, reason: String },

    /// The batch produced zero usable items.
    #[error("No usable items in {feed} payload")]
    EmptyPayload { feed: String },

    #[error("Source unavailable: {message}")]
    SourceUnavailable { message: String },
}

impl IngestError {
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        IngestError::MalformedItem {
            index,
            reason: reason.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        IngestError::SourceUnavailable {
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum FeedError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),
}

pub type Result<T> = std::result::Result<T, FeedError>;
