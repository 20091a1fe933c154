use std::sync::Arc;

use ringcut_store::{ContentStore, FsContentStore};
use ringcut_transcode::{CancelSignal, FfmpegTranscoder, TranscoderConfig, Transcoder};
use ringcut_types::{ContentHash, ConversionRequest};

use crate::convert::Converter;
use crate::error::ServiceResult;
use crate::ingest::Ingestor;
use crate::retrieve::{Retriever, RingtoneArtifact};

/// The three pipeline components over one shared store.
#[derive(Clone)]
pub struct RingtoneService {
    ingestor: Ingestor,
    converter: Converter,
    retriever: Retriever,
}

impl RingtoneService {
    pub fn new(store: Arc<dyn ContentStore>, transcoder: Arc<dyn Transcoder>) -> Self {
        Self {
            ingestor: Ingestor::new(Arc::clone(&store)),
            converter: Converter::new(Arc::clone(&store), transcoder),
            retriever: Retriever::new(store),
        }
    }

    /// Filesystem store under `store`'s root with an ffmpeg transcoder.
    ///
    /// Scratch output lives under the store root, so publishing a finished
    /// ringtone is a rename within one filesystem.
    pub fn on_disk(store: FsContentStore, transcoder: TranscoderConfig, cancel: CancelSignal) -> Self {
        let scratch = store.root().join(".scratch");
        let mut service = Self::new(
            Arc::new(store),
            Arc::new(FfmpegTranscoder::new(transcoder)),
        );
        service.converter = service
            .converter
            .with_scratch_dir(scratch)
            .with_cancel(cancel);
        service
    }

    pub async fn ingest<B>(&self, data: B, declared_mime: &str) -> ServiceResult<ContentHash>
    where
        B: AsRef<[u8]> + Send + 'static,
    {
        self.ingestor.ingest(data, declared_mime).await
    }

    pub async fn convert(&self, request: ConversionRequest) -> ServiceResult<ConversionRequest> {
        self.converter.convert(request).await
    }

    pub async fn retrieve(&self, hash: &ContentHash) -> ServiceResult<RingtoneArtifact> {
        self.retriever.retrieve(hash).await
    }
}
