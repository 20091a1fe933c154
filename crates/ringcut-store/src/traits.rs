use std::io::Write;
use std::path::{Path, PathBuf};

use ringcut_types::{ContentHash, SlotKind};
use tempfile::TempPath;

use crate::error::StoreResult;

/// Content-addressed slot store.
///
/// All implementations must satisfy these invariants:
/// - `(kind, hash)` resolves to exactly one slot.
/// - `put` is atomic: readers see either the previous content or the new
///   content, never a prefix of it.
/// - Deleting an absent slot is not an error.
/// - All I/O errors are propagated, never silently ignored.
pub trait ContentStore: Send + Sync {
    /// Write `data` into the slot, replacing any previous content.
    fn put(&self, kind: SlotKind, hash: &ContentHash, data: &[u8]) -> StoreResult<()>;

    /// Move the file at `src` into the slot, replacing any previous content.
    /// Returns the number of bytes published.
    ///
    /// `src` is consumed: after success it no longer exists. The default
    /// reads it and goes through [`put`](Self::put).
    fn put_file(&self, kind: SlotKind, hash: &ContentHash, src: &Path) -> StoreResult<u64> {
        let data = std::fs::read(src)?;
        self.put(kind, hash, &data)?;
        std::fs::remove_file(src)?;
        Ok(data.len() as u64)
    }

    /// Read the full content of a slot.
    ///
    /// Returns `Err(StoreError::NotFound)` if the slot is empty.
    fn get(&self, kind: SlotKind, hash: &ContentHash) -> StoreResult<Vec<u8>>;

    /// Remove a slot. Returns `true` if the slot existed.
    fn delete(&self, kind: SlotKind, hash: &ContentHash) -> StoreResult<bool>;

    /// Check whether a slot is populated.
    fn exists(&self, kind: SlotKind, hash: &ContentHash) -> StoreResult<bool>;

    /// Expose a slot as a file on the local filesystem, for external readers
    /// such as the transcoder.
    ///
    /// Default implementation copies the slot into a temporary file that is
    /// removed when the returned handle drops. Filesystem backends override
    /// this to hand out the slot path directly.
    fn local_path(&self, kind: SlotKind, hash: &ContentHash) -> StoreResult<LocalPath> {
        let data = self.get(kind, hash)?;
        let mut file = tempfile::Builder::new()
            .prefix("ringcut-")
            .suffix(&format!(".{}", kind.extension()))
            .tempfile()?;
        file.write_all(&data)?;
        file.flush()?;
        Ok(LocalPath::Spilled(file.into_temp_path()))
    }
}

/// A slot reachable as a local file.
#[derive(Debug)]
pub enum LocalPath {
    /// The slot's own file.
    Slot(PathBuf),
    /// A temporary copy, deleted on drop.
    Spilled(TempPath),
}

impl LocalPath {
    pub fn path(&self) -> &Path {
        match self {
            Self::Slot(path) => path.as_path(),
            Self::Spilled(temp) => temp.as_ref(),
        }
    }
}
