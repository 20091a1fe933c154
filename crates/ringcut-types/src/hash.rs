use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Length of the hex rendering of a [`ContentHash`].
pub const HEX_LEN: usize = 64;

/// Content-addressed identifier for an uploaded asset.
///
/// A `ContentHash` is the BLAKE3 hash of an asset's bytes. Identical content
/// always produces the same hash, so re-uploading a file lands in the same
/// storage slot. The hash is the only handle a client ever gets for an asset
/// and its derived ringtone.
///
/// On the wire and on disk it is always 64 lowercase hex characters. Parsing
/// rejects anything else, which keeps hashes safe to splice into file paths.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Compute the hash of raw bytes.
    pub fn of(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Create a `ContentHash` from a pre-computed digest.
    pub fn from_digest(digest: [u8; 32]) -> Self {
        Self(digest)
    }

    /// The raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters), for logs.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from exactly 64 lowercase hex characters.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        if s.len() != HEX_LEN {
            return Err(TypeError::InvalidLength {
                expected: HEX_LEN,
                actual: s.len(),
            });
        }
        if !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(TypeError::InvalidHash(
                "expected lowercase hexadecimal characters".into(),
            ));
        }
        let mut arr = [0u8; 32];
        hex::decode_to_slice(s, &mut arr).map_err(|e| TypeError::InvalidHash(e.to_string()))?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.short_hex())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for ContentHash {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl From<[u8; 32]> for ContentHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn of_is_deterministic() {
        let data = b"ID3 fake mp3 frame";
        assert_eq!(ContentHash::of(data), ContentHash::of(data));
    }

    #[test]
    fn different_data_produces_different_hashes() {
        assert_ne!(ContentHash::of(b"hello"), ContentHash::of(b"world"));
    }

    #[test]
    fn hex_roundtrip() {
        let hash = ContentHash::of(b"test");
        let hex = hash.to_hex();
        assert_eq!(hex.len(), HEX_LEN);
        assert_eq!(ContentHash::from_hex(&hex).unwrap(), hash);
    }

    #[test]
    fn display_is_full_lowercase_hex() {
        let hash = ContentHash::of(b"test");
        let display = format!("{hash}");
        assert_eq!(display, hash.to_hex());
        assert_eq!(display, display.to_lowercase());
    }

    #[test]
    fn rejects_uppercase() {
        let upper = ContentHash::of(b"test").to_hex().to_uppercase();
        assert!(matches!(
            ContentHash::from_hex(&upper),
            Err(TypeError::InvalidHash(_))
        ));
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            ContentHash::from_hex("abcd"),
            Err(TypeError::InvalidLength {
                expected: 64,
                actual: 4
            })
        );
    }

    #[test]
    fn rejects_path_traversal() {
        let sneaky = format!("../../etc/passwd{}", "0".repeat(HEX_LEN - 16));
        assert_eq!(sneaky.len(), HEX_LEN);
        assert!(ContentHash::from_hex(&sneaky).is_err());
    }

    #[test]
    fn serde_as_hex_string() {
        let hash = ContentHash::of(b"serde test");
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", hash.to_hex()));
        let parsed: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, hash);
    }

    #[test]
    fn serde_rejects_garbage() {
        assert!(serde_json::from_str::<ContentHash>("\"not-a-hash\"").is_err());
    }

    #[test]
    fn short_hex_is_8_chars() {
        assert_eq!(ContentHash::of(b"test").short_hex().len(), 8);
    }

    proptest! {
        #[test]
        fn same_bytes_same_hash(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
            prop_assert_eq!(ContentHash::of(&data), ContentHash::of(&data.clone()));
        }

        #[test]
        fn rendered_hash_always_parses(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            let hash = ContentHash::of(&data);
            prop_assert_eq!(hash.to_hex().parse::<ContentHash>().unwrap(), hash);
        }
    }
}
