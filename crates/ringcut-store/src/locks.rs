use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use ringcut_types::ContentHash;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Per-hash writer locks.
///
/// Conversions for the same hash run one at a time; different hashes never
/// contend. Entries exist only while a lock is held or awaited.
#[derive(Default)]
pub struct SlotLocks {
    entries: Mutex<HashMap<ContentHash, LockEntry>>,
}

#[derive(Default)]
struct LockEntry {
    mutex: Arc<AsyncMutex<()>>,
    /// Holders plus waiters.
    users: usize,
}

impl SlotLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `hash`.
    ///
    /// Dropping the returned future before it resolves unregisters the
    /// waiter.
    pub async fn lock(&self, hash: &ContentHash) -> SlotGuard<'_> {
        let mutex = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            let entry = entries.entry(*hash).or_default();
            entry.users += 1;
            Arc::clone(&entry.mutex)
        };
        // Registered from here on: the guard's drop unregisters, whether or
        // not the mutex was ever acquired.
        let mut slot = SlotGuard {
            locks: self,
            hash: *hash,
            guard: None,
        };
        slot.guard = Some(mutex.lock_owned().await);
        slot
    }

    /// Number of hashes currently locked or awaited.
    pub fn active(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn release(&self, hash: &ContentHash) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.get_mut(hash) {
            entry.users = entry.users.saturating_sub(1);
            if entry.users == 0 {
                entries.remove(hash);
            }
        }
    }
}

impl std::fmt::Debug for SlotLocks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotLocks")
            .field("active", &self.active())
            .finish()
    }
}

/// Exclusive access to one hash. Released on drop.
pub struct SlotGuard<'a> {
    locks: &'a SlotLocks,
    hash: ContentHash,
    guard: Option<OwnedMutexGuard<()>>,
}

impl SlotGuard<'_> {
    pub fn hash(&self) -> &ContentHash {
        &self.hash
    }
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks.release(&self.hash);
    }
}
