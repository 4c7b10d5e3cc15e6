use thiserror::Error;

/// Top-level error type for NewsLens.
///
/// Collaborator failures (embedding, entity extraction, retrieval) are
/// reported through this type and propagate to the caller untouched. The
/// analysis crates wrap it in their own error types via `From`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NewsLensError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Entity extraction error: {0}")]
    Extraction(String),

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for NewsLensError {
    fn from(err: toml::de::Error) -> Self {
        NewsLensError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for NewsLensError {
    fn from(err: toml::ser::Error) -> Self {
        NewsLensError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for NewsLensError {
    fn from(err: serde_json::Error) -> Self {
        NewsLensError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for NewsLens operations.
pub type Result<T> = std::result::Result<T, NewsLensError>;
