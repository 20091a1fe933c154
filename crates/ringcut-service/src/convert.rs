use std::path::PathBuf;
use std::sync::Arc;

use ringcut_store::{ContentStore, SlotLocks, StoreError};
use ringcut_transcode::{CancelSignal, TranscodeJob, Transcoder};
use ringcut_types::{ConversionRequest, SlotKind};

use crate::error::{ServiceError, ServiceResult};

/// Cuts a ringtone out of a stored asset.
///
/// The transcoder writes into a private scratch directory. Only a complete,
/// non-empty result is published into the derived slot, which replaces any
/// previous ringtone in one atomic step. A failed conversion leaves the
/// previous ringtone (or the empty slot) exactly as it was.
#[derive(Clone)]
pub struct Converter {
    store: Arc<dyn ContentStore>,
    transcoder: Arc<dyn Transcoder>,
    locks: Arc<SlotLocks>,
    scratch_dir: Option<PathBuf>,
    cancel: CancelSignal,
}

impl Converter {
    pub fn new(store: Arc<dyn ContentStore>, transcoder: Arc<dyn Transcoder>) -> Self {
        Self {
            store,
            transcoder,
            locks: Arc::new(SlotLocks::new()),
            scratch_dir: None,
            cancel: CancelSignal::never(),
        }
    }

    /// Directory for in-flight transcoder output. Defaults to the system
    /// temp directory.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Abort running transcodes when `cancel` fires.
    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn locks(&self) -> &SlotLocks {
        &self.locks
    }

    /// Convert and publish. Returns the accepted request.
    pub async fn convert(&self, request: ConversionRequest) -> ServiceResult<ConversionRequest> {
        request.validate()?;
        let hash = request.hash;

        let store = Arc::clone(&self.store);
        let present = crate::blocking(move || {
            store.exists(SlotKind::Raw, &hash).map_err(ServiceError::from)
        })
        .await?;
        if !present {
            return Err(ServiceError::NotFound(format!("asset not found: {hash}")));
        }

        let _guard = self.locks.lock(&hash).await;

        let store = Arc::clone(&self.store);
        let input = crate::blocking(move || {
            store.local_path(SlotKind::Raw, &hash).map_err(ServiceError::from)
        })
        .await?;

        let scratch_dir = self.scratch_dir.clone();
        let scratch = crate::blocking(move || {
            let mut builder = tempfile::Builder::new();
            builder.prefix("ringcut-");
            let dir = match scratch_dir {
                Some(dir) => {
                    std::fs::create_dir_all(&dir).map_err(StoreError::from)?;
                    builder.tempdir_in(dir)
                }
                None => builder.tempdir(),
            };
            dir.map_err(|e| ServiceError::from(StoreError::from(e)))
        })
        .await?;
        let output = scratch.path().join(SlotKind::Derived.file_name(&hash));

        let job = TranscodeJob {
            request: &request,
            input: input.path(),
            output: &output,
        };
        let report = match self.transcoder.transcode(job, &self.cancel).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(
                    hash = %hash,
                    start = request.start,
                    duration = request.duration,
                    error = %e,
                    diagnostics = %diagnostics_of(&e),
                    "conversion failed"
                );
                return Err(e.into());
            }
        };

        let store = Arc::clone(&self.store);
        let published = crate::blocking(move || {
            let bytes = store.put_file(SlotKind::Derived, &hash, &output)?;
            drop(scratch);
            Ok(bytes)
        })
        .await?;

        tracing::info!(
            hash = %hash,
            start = request.start,
            duration = request.duration,
            fade = request.fade,
            bytes = published,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "ringtone converted"
        );
        Ok(request)
    }
}

fn diagnostics_of(e: &ringcut_transcode::TranscodeError) -> &str {
    match e {
        ringcut_transcode::TranscodeError::Failed { diagnostics, .. } => diagnostics,
        _ => "",
    }
}
