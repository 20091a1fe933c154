use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use ringcut_types::ConversionRequest;

use crate::cancel::CancelSignal;
use crate::config::TranscoderConfig;
use crate::error::{TranscodeError, TranscodeResult};
use crate::invocation::Invocation;

/// Keep at most this many bytes of transcoder output for diagnostics.
const DIAGNOSTIC_TAIL: usize = 4096;

/// One conversion to run: the request's trim window applied to `input`,
/// written to `output`.
#[derive(Clone, Copy, Debug)]
pub struct TranscodeJob<'a> {
    pub request: &'a ConversionRequest,
    pub input: &'a Path,
    pub output: &'a Path,
}

/// Outcome of a successful transcode.
#[derive(Clone, Debug)]
pub struct TranscodeReport {
    pub elapsed: Duration,
    pub output_bytes: u64,
    /// Tail of the combined stdout/stderr.
    pub diagnostics: String,
}

/// Produces a ringtone file from a source file.
///
/// Implementations write only to `job.output`; the caller owns that path
/// and decides whether to publish it.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn transcode(
        &self,
        job: TranscodeJob<'_>,
        cancel: &CancelSignal,
    ) -> TranscodeResult<TranscodeReport>;
}

/// Runs an ffmpeg-compatible program as a child process.
#[derive(Clone, Debug)]
pub struct FfmpegTranscoder {
    config: TranscoderConfig,
}

impl FfmpegTranscoder {
    pub fn new(config: TranscoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranscoderConfig {
        &self.config
    }

    pub fn invocation(&self, job: &TranscodeJob<'_>) -> Invocation {
        Invocation::build(
            &self.config.program,
            &self.config.profile,
            job.request.start,
            job.request.duration,
            job.request.fade,
            job.input,
            job.output,
        )
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(
        &self,
        job: TranscodeJob<'_>,
        cancel: &CancelSignal,
    ) -> TranscodeResult<TranscodeReport> {
        if cancel.is_cancelled() {
            return Err(TranscodeError::Cancelled);
        }

        let invocation = self.invocation(&job);
        tracing::debug!(command = %invocation.display(), "spawning transcoder");

        let started = Instant::now();
        let child = invocation
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| TranscodeError::Spawn {
                program: invocation.program().to_path_buf(),
                source,
            })?;

        let timeout = self.config.timeout();
        // Dropping the wait future drops the child, which kills it.
        let output = tokio::select! {
            output = child.wait_with_output() => output?,
            _ = tokio::time::sleep(timeout) => {
                tracing::warn!(?timeout, hash = %job.request.hash.short_hex(), "transcoder timed out, killing");
                return Err(TranscodeError::TimedOut(timeout));
            }
            _ = cancel.cancelled() => {
                tracing::warn!(hash = %job.request.hash.short_hex(), "transcode cancelled, killing");
                return Err(TranscodeError::Cancelled);
            }
        };

        let diagnostics = combined_tail(&output.stdout, &output.stderr);
        if !output.status.success() {
            return Err(TranscodeError::Failed {
                code: output.status.code(),
                diagnostics,
            });
        }

        let output_bytes = match tokio::fs::metadata(job.output).await {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e.into()),
        };
        if output_bytes == 0 {
            return Err(TranscodeError::EmptyOutput);
        }

        Ok(TranscodeReport {
            elapsed: started.elapsed(),
            output_bytes,
            diagnostics,
        })
    }
}

fn combined_tail(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::from_utf8_lossy(stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(stderr));
    let combined = combined.trim();
    if combined.len() <= DIAGNOSTIC_TAIL {
        return combined.to_string();
    }
    let mut cut = combined.len() - DIAGNOSTIC_TAIL;
    while !combined.is_char_boundary(cut) {
        cut += 1;
    }
    combined[cut..].to_string()
}
