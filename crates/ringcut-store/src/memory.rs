use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use ringcut_types::{ContentHash, SlotKind};

use crate::error::{StoreError, StoreResult};
use crate::traits::ContentStore;

/// In-memory, HashMap-based slot store.
///
/// Intended for tests and embedding. Slots are cloned on read/write.
#[derive(Default)]
pub struct InMemoryContentStore {
    slots: RwLock<HashMap<(SlotKind, ContentHash), Vec<u8>>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of populated slots.
    pub fn len(&self) -> usize {
        self.slots.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ContentStore for InMemoryContentStore {
    fn put(&self, kind: SlotKind, hash: &ContentHash, data: &[u8]) -> StoreResult<()> {
        let mut map = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        map.insert((kind, *hash), data.to_vec());
        Ok(())
    }

    fn get(&self, kind: SlotKind, hash: &ContentHash) -> StoreResult<Vec<u8>> {
        let map = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        map.get(&(kind, *hash))
            .cloned()
            .ok_or(StoreError::NotFound { kind, hash: *hash })
    }

    fn delete(&self, kind: SlotKind, hash: &ContentHash) -> StoreResult<bool> {
        let mut map = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Ok(map.remove(&(kind, *hash)).is_some())
    }

    fn exists(&self, kind: SlotKind, hash: &ContentHash) -> StoreResult<bool> {
        let map = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        Ok(map.contains_key(&(kind, *hash)))
    }
}

impl std::fmt::Debug for InMemoryContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryContentStore")
            .field("slot_count", &self.len())
            .finish()
    }
}
