//! Foundation types for ringcut.
//!
//! Every other ringcut crate depends on `ringcut-types`.
//!
//! # Key Types
//!
//! - [`ContentHash`]: Content-addressed identifier (BLAKE3 hash) of an uploaded asset
//! - [`SlotKind`]: Which of the two per-hash storage slots a file lives in
//! - [`ConversionRequest`]: Trim/fade parameters for producing a ringtone

pub mod error;
pub mod hash;
pub mod request;
pub mod slot;

pub use error::TypeError;
pub use hash::ContentHash;
pub use request::ConversionRequest;
pub use slot::SlotKind;
