//! Error type for quality assurance operations.

/// Error type for quality assurance operations.
pub type Result<T> = std::result::Result<T, QaError>;

/// Errors that can occur at the engine boundary.
///
/// Failing a quality gate is not an error; these cover bad input,
/// bad configuration, and worker failures only.
#[derive(Debug, thiserror::Error)]
pub enum QaError {
    /// Request payload had the wrong shape (e.g. non-string section text)
    #[error("Malformed input: {0}")]
    MalformedInput(#[from] serde_json::Error),

    /// Threshold configuration out of range
    #[error("Invalid thresholds: {0}")]
    InvalidThresholds(String),

    /// I/O error while loading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A concurrent analyzer task failed to complete
    #[error("Analyzer worker failed: {0}")]
    Worker(String),
}
