use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("invalid hash length: expected {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },
}
