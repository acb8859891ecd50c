//! Error types for the memory domain

use thiserror::Error;

/// Memory domain error types
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("no session is bound; bind a session before calling memory operations")]
    UninitializedSession,

    #[error("step index {index} out of range for log of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for memory operations
pub type Result<T> = std::result::Result<T, MemoryError>;
