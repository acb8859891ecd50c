//! Error types for the tool surface

use thiserror::Error;

/// Tool dispatch error types
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Memory error: {0}")]
    Memory(#[from] stepvault_core::MemoryError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for tool operations
pub type Result<T> = std::result::Result<T, ToolError>;
