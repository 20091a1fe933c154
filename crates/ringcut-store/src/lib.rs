//! Content-addressed slot storage for ringcut.
//!
//! Every uploaded asset is addressed by its [`ContentHash`](ringcut_types::ContentHash).
//! Each hash owns exactly two slots: the raw upload and the derived ringtone
//! ([`SlotKind`](ringcut_types::SlotKind)).
//!
//! # Storage Backends
//!
//! All backends implement the [`ContentStore`] trait:
//!
//! - [`FsContentStore`] -- one file per slot under a root directory
//! - [`InMemoryContentStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. A slot never observably holds partial data: writes go to a temporary
//!    file first and are published with an atomic rename.
//! 2. Writers of a derived slot are serialized per hash through [`SlotLocks`].
//! 3. The store never interprets slot contents.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod locks;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsContentStore;
pub use locks::{SlotGuard, SlotLocks};
pub use memory::InMemoryContentStore;
pub use traits::{ContentStore, LocalPath};
