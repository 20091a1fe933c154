use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("failed to start transcoder {program:?}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("transcoder exited with {}", exit_label(.code))]
    Failed {
        code: Option<i32>,
        diagnostics: String,
    },

    #[error("transcoder timed out after {0:?}")]
    TimedOut(Duration),

    #[error("transcode cancelled")]
    Cancelled,

    #[error("transcoder produced no output")]
    EmptyOutput,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TranscodeResult<T> = Result<T, TranscodeError>;

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (killed by signal)".into(),
    }
}
