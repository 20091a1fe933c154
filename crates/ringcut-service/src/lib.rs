//! The ringcut pipeline: ingest an upload, cut a ringtone out of it, serve
//! the result.
//!
//! ```text
//! ingest(bytes, mime) -> hash
//! convert({hash, start, duration, fade}) -> echo
//! retrieve(hash) -> ring.m4r bytes
//! ```
//!
//! Each stage is a small component over a shared
//! [`ContentStore`](ringcut_store::ContentStore); [`RingtoneService`] wires
//! them together.

pub mod convert;
pub mod error;
pub mod ingest;
pub mod retrieve;
pub mod service;

pub use convert::Converter;
pub use error::{ServiceError, ServiceResult};
pub use ingest::{Ingestor, ACCEPTED_MIME_TYPE};
pub use retrieve::{Retriever, RingtoneArtifact, RINGTONE_FILE_NAME};
pub use service::RingtoneService;

/// Run blocking store work off the async executor.
pub(crate) async fn blocking<T, F>(f: F) -> ServiceResult<T>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServiceError::Internal(format!("blocking task failed: {e}")))?
}
