use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hash::ContentHash;

/// The two storage slots every content hash can occupy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    /// The uploaded source audio, exactly as received.
    Raw,
    /// The converted ringtone excerpt.
    Derived,
}

impl SlotKind {
    /// File extension used on disk.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Raw => "mp3",
            Self::Derived => "m4r",
        }
    }

    /// MIME type of the bytes held in this slot.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Raw => "audio/mp3",
            Self::Derived => "audio/x-m4r",
        }
    }

    /// File name of the slot for `hash`, e.g. `<hex>.m4r`.
    pub fn file_name(&self, hash: &ContentHash) -> String {
        format!("{}.{}", hash.to_hex(), self.extension())
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => write!(f, "raw"),
            Self::Derived => write!(f, "derived"),
        }
    }
}
