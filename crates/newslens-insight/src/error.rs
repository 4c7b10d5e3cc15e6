use newslens_core::error::NewsLensError;
use thiserror::Error;

/// Errors that can occur in the analysis engine.
///
/// Collaborator failures arrive as [`NewsLensError`] and are passed through
/// unchanged; the engine never retries them.
#[derive(Error, Debug)]
pub enum InsightError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Core(#[from] NewsLensError),
}

/// A specialized `Result` type for analysis operations.
pub type Result<T> = std::result::Result<T, InsightError>;
