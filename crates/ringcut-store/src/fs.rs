use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use ringcut_types::{ContentHash, SlotKind};

use crate::error::{StoreError, StoreResult};
use crate::traits::{ContentStore, LocalPath};

/// Filesystem-backed slot store.
///
/// Layout is flat: `<root>/<hash>.mp3` for raw uploads and
/// `<root>/<hash>.m4r` for derived ringtones. Writes land in a hidden
/// temporary file inside `root` and are renamed over the slot, so the rename
/// never crosses a filesystem boundary.
#[derive(Clone, Debug)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root directory if it does not exist yet.
    pub fn ensure_root(&self) -> StoreResult<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Path of the slot for `(kind, hash)`, whether or not it exists.
    pub fn slot_path(&self, kind: SlotKind, hash: &ContentHash) -> PathBuf {
        self.root.join(kind.file_name(hash))
    }
}

impl ContentStore for FsContentStore {
    fn put(&self, kind: SlotKind, hash: &ContentHash, data: &[u8]) -> StoreResult<()> {
        self.ensure_root()?;
        let target = self.slot_path(kind, hash);

        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{}.", hash.short_hex()))
            .suffix(".tmp")
            .tempfile_in(&self.root)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| StoreError::Io(e.error))?;

        tracing::debug!(%kind, hash = %hash.short_hex(), bytes = data.len(), "slot written");
        Ok(())
    }

    fn put_file(&self, kind: SlotKind, hash: &ContentHash, src: &Path) -> StoreResult<u64> {
        self.ensure_root()?;
        let target = self.slot_path(kind, hash);

        let file = fs::File::open(src)?;
        let bytes = file.metadata()?.len();
        file.sync_all()?;
        drop(file);

        if let Err(e) = fs::rename(src, &target) {
            // Most likely `src` is on another filesystem.
            tracing::debug!(error = %e, src = %src.display(), "rename failed, copying into slot");
            let data = fs::read(src)?;
            self.put(kind, hash, &data)?;
            fs::remove_file(src)?;
            return Ok(data.len() as u64);
        }

        tracing::debug!(%kind, hash = %hash.short_hex(), bytes, "slot published by rename");
        Ok(bytes)
    }

    fn get(&self, kind: SlotKind, hash: &ContentHash) -> StoreResult<Vec<u8>> {
        match fs::read(self.slot_path(kind, hash)) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound { kind, hash: *hash })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, kind: SlotKind, hash: &ContentHash) -> StoreResult<bool> {
        match fs::remove_file(self.slot_path(kind, hash)) {
            Ok(()) => {
                tracing::debug!(%kind, hash = %hash.short_hex(), "slot deleted");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, kind: SlotKind, hash: &ContentHash) -> StoreResult<bool> {
        match fs::metadata(self.slot_path(kind, hash)) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn local_path(&self, kind: SlotKind, hash: &ContentHash) -> StoreResult<LocalPath> {
        if !self.exists(kind, hash)? {
            return Err(StoreError::NotFound { kind, hash: *hash });
        }
        Ok(LocalPath::Slot(self.slot_path(kind, hash)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, FsContentStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsContentStore::new(dir.path().join("audio"));
        (dir, store)
    }

    #[test]
    fn put_creates_root_and_slot() {
        let (_dir, store) = temp_store();
        assert!(!store.root().exists());

        let hash = ContentHash::of(b"mp3 bytes");
        store.put(SlotKind::Raw, &hash, b"mp3 bytes").unwrap();

        assert!(store.root().is_dir());
        let path = store.slot_path(SlotKind::Raw, &hash);
        assert_eq!(path.file_name().unwrap().to_str().unwrap(), format!("{hash}.mp3"));
        assert_eq!(fs::read(path).unwrap(), b"mp3 bytes");
    }

    #[test]
    fn get_returns_written_bytes() {
        let (_dir, store) = temp_store();
        let hash = ContentHash::of(b"abc");
        store.put(SlotKind::Derived, &hash, b"m4r").unwrap();
        assert_eq!(store.get(SlotKind::Derived, &hash).unwrap(), b"m4r");
    }

    #[test]
    fn get_missing_slot_is_not_found() {
        let (_dir, store) = temp_store();
        let hash = ContentHash::of(b"nothing");
        let err = store.get(SlotKind::Derived, &hash).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn kinds_are_separate_slots() {
        let (_dir, store) = temp_store();
        let hash = ContentHash::of(b"both");
        store.put(SlotKind::Raw, &hash, b"raw").unwrap();
        assert!(store.exists(SlotKind::Raw, &hash).unwrap());
        assert!(!store.exists(SlotKind::Derived, &hash).unwrap());
    }

    #[test]
    fn put_replaces_previous_content_fully() {
        let (_dir, store) = temp_store();
        let hash = ContentHash::of(b"key");
        store.put(SlotKind::Derived, &hash, b"a much longer first version").unwrap();
        store.put(SlotKind::Derived, &hash, b"short").unwrap();
        assert_eq!(store.get(SlotKind::Derived, &hash).unwrap(), b"short");
    }

    #[test]
    fn put_leaves_no_temporary_files() {
        let (_dir, store) = temp_store();
        let hash = ContentHash::of(b"tidy");
        store.put(SlotKind::Raw, &hash, b"tidy").unwrap();
        store.put(SlotKind::Derived, &hash, b"tidy").unwrap();
        let names: Vec<_> = fs::read_dir(store.root())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.iter().all(|n| !n.ends_with(".tmp")));
    }

    #[test]
    fn put_file_renames_into_slot() {
        let (_dir, store) = temp_store();
        let hash = ContentHash::of(b"song");
        store.put(SlotKind::Derived, &hash, b"previous").unwrap();

        let scratch = store.root().join(".scratch");
        fs::create_dir_all(&scratch).unwrap();
        let src = scratch.join("out.m4r");
        fs::write(&src, b"converted").unwrap();

        let bytes = store.put_file(SlotKind::Derived, &hash, &src).unwrap();
        assert_eq!(bytes, 9);
        assert!(!src.exists());
        assert_eq!(store.get(SlotKind::Derived, &hash).unwrap(), b"converted");
    }

    #[test]
    fn put_file_of_missing_source_keeps_slot() {
        let (_dir, store) = temp_store();
        let hash = ContentHash::of(b"song");
        store.put(SlotKind::Derived, &hash, b"previous").unwrap();
        let missing = store.root().join("nope.m4r");
        assert!(store.put_file(SlotKind::Derived, &hash, &missing).is_err());
        assert_eq!(store.get(SlotKind::Derived, &hash).unwrap(), b"previous");
    }

    #[test]
    fn delete_is_idempotent() {
        let (_dir, store) = temp_store();
        let hash = ContentHash::of(b"gone");
        store.put(SlotKind::Derived, &hash, b"gone").unwrap();
        assert!(store.delete(SlotKind::Derived, &hash).unwrap());
        assert!(!store.delete(SlotKind::Derived, &hash).unwrap());
        assert!(!store.exists(SlotKind::Derived, &hash).unwrap());
    }

    #[test]
    fn delete_without_root_is_not_an_error() {
        let (_dir, store) = temp_store();
        assert!(!store.delete(SlotKind::Raw, &ContentHash::of(b"x")).unwrap());
    }

    #[test]
    fn local_path_is_the_slot_itself() {
        let (_dir, store) = temp_store();
        let hash = ContentHash::of(b"local");
        store.put(SlotKind::Raw, &hash, b"local").unwrap();
        let local = store.local_path(SlotKind::Raw, &hash).unwrap();
        assert!(matches!(local, LocalPath::Slot(_)));
        assert_eq!(local.path(), store.slot_path(SlotKind::Raw, &hash));
    }

    #[test]
    fn local_path_of_missing_slot_is_not_found() {
        let (_dir, store) = temp_store();
        let err = store.local_path(SlotKind::Raw, &ContentHash::of(b"x")).unwrap_err();
        assert!(err.is_not_found());
    }
}
