use std::sync::Arc;

use ringcut_store::ContentStore;
use ringcut_types::{ContentHash, SlotKind};

use crate::error::{ServiceError, ServiceResult};

/// The only upload type accepted.
pub const ACCEPTED_MIME_TYPE: &str = "audio/mp3";

/// Validates and stores uploaded audio under its content hash.
#[derive(Clone)]
pub struct Ingestor {
    store: Arc<dyn ContentStore>,
}

impl Ingestor {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Store `data` in the raw slot for its hash and return the hash.
    ///
    /// Uploading the same bytes twice returns the same hash and rewrites the
    /// same slot. Nothing is written when validation fails.
    pub async fn ingest<B>(&self, data: B, declared_mime: &str) -> ServiceResult<ContentHash>
    where
        B: AsRef<[u8]> + Send + 'static,
    {
        if declared_mime != ACCEPTED_MIME_TYPE {
            return Err(ServiceError::Validation(format!(
                "invalid file type: {declared_mime}"
            )));
        }

        let store = Arc::clone(&self.store);
        let (hash, size) = crate::blocking(move || {
            let bytes = data.as_ref();
            let hash = ContentHash::of(bytes);
            store.put(SlotKind::Raw, &hash, bytes)?;
            Ok((hash, bytes.len()))
        })
        .await?;

        tracing::info!(hash = %hash, bytes = size, "asset ingested");
        Ok(hash)
    }
}
