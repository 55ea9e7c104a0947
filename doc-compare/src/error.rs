use thiserror::Error;

/// Errors produced by the comparison core.
///
/// Only failures that abort an operation surface here. A single prompt
/// variant failing mid-comparison is represented as data (an error sentinel
/// inside the variant's `ComparisonResult`), never as an `Err` crossing the
/// orchestrator boundary.
#[derive(Error, Debug)]
pub enum CompareError {
    /// Uploading a document to the file service failed. Fatal for the whole
    /// comparison; no partial result is produced.
    #[error("File upload failed: {0}")]
    Upload(String),

    /// A generateContent request failed (transport, status, or an empty
    /// candidate). The orchestrator converts this into a variant sentinel.
    #[error("LLM request failed: {0}")]
    LlmCall(String),

    /// Missing or invalid environment configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CompareError>;
