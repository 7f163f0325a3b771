//! Error types for processor operations.

use thiserror::Error;

/// Errors produced by the processor and its builder.
///
/// The queue itself has no error conditions: absent keys and empty queues are
/// reported through `Option` or ignored.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// The processor has been closed and no longer accepts changes.
    #[error("processor is stopped")]
    Stopped,
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
