use ringcut_store::StoreError;
use ringcut_transcode::TranscodeError;
use ringcut_types::TypeError;
use thiserror::Error;

/// Errors surfaced by the pipeline components.
///
/// The four public classes map one-to-one onto response classes at the HTTP
/// boundary: client-correctable input, a missing slot, a storage failure,
/// and a failed transcode.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(#[source] StoreError),

    #[error("convert failed: {0}")]
    Conversion(#[from] TranscodeError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { .. } => Self::NotFound(e.to_string()),
            other => Self::Storage(other),
        }
    }
}

impl From<TypeError> for ServiceError {
    fn from(e: TypeError) -> Self {
        Self::Validation(e.to_string())
    }
}
