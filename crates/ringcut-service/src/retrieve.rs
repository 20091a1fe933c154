use std::sync::Arc;

use ringcut_store::ContentStore;
use ringcut_types::{ContentHash, SlotKind};

use crate::error::{ServiceError, ServiceResult};

/// Suggested download name for every ringtone.
pub const RINGTONE_FILE_NAME: &str = "ring.m4r";

/// A converted ringtone ready to hand to a client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RingtoneArtifact {
    pub hash: ContentHash,
    pub bytes: Vec<u8>,
}

impl RingtoneArtifact {
    pub fn content_type(&self) -> &'static str {
        SlotKind::Derived.content_type()
    }

    pub fn file_name(&self) -> &'static str {
        RINGTONE_FILE_NAME
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Serves previously converted ringtones.
#[derive(Clone)]
pub struct Retriever {
    store: Arc<dyn ContentStore>,
}

impl Retriever {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub async fn retrieve(&self, hash: &ContentHash) -> ServiceResult<RingtoneArtifact> {
        let hash = *hash;
        let store = Arc::clone(&self.store);
        let bytes = crate::blocking(move || match store.get(SlotKind::Derived, &hash) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.is_not_found() => Err(ServiceError::NotFound(format!(
                "no ringtone for {hash}, convert it first"
            ))),
            Err(e) => Err(e.into()),
        })
        .await?;

        tracing::debug!(hash = %hash, bytes = bytes.len(), "ringtone retrieved");
        Ok(RingtoneArtifact { hash, bytes })
    }
}
