//! External transcoder invocation for ringcut.
//!
//! The transcoding engine is a black box: a command-line program (ffmpeg by
//! default) called with a fixed argument template. This crate owns the
//! mapping from a [`ConversionRequest`](ringcut_types::ConversionRequest) to
//! that argument list, and runs the program with a timeout and a
//! cancellation signal.

pub mod cancel;
pub mod config;
pub mod error;
pub mod invocation;
pub mod transcoder;

pub use cancel::{CancelHandle, CancelSignal};
pub use config::{TranscodeProfile, TranscoderConfig};
pub use error::{TranscodeError, TranscodeResult};
pub use invocation::Invocation;
pub use transcoder::{FfmpegTranscoder, TranscodeJob, TranscodeReport, Transcoder};
