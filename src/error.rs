use std::io;

/// Custom error type for bithook operations
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("hook with the id {0} has already been loaded")]
    DuplicateHookId(String),

    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Helper type for Results that use HookError
pub type Result<T> = std::result::Result<T, HookError>;
