use std::future::Future;
use std::sync::Arc;

use ringcut_service::RingtoneService;
use ringcut_store::FsContentStore;
use ringcut_transcode::CancelHandle;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::router::build_router;

/// ringcut HTTP server.
pub struct RingcutServer {
    config: ServerConfig,
    service: RingtoneService,
    cancel: Arc<CancelHandle>,
}

impl RingcutServer {
    /// Wire an on-disk store and an ffmpeg transcoder from `config`.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        config.validate()?;
        let cancel = Arc::new(CancelHandle::new());
        let service = RingtoneService::on_disk(
            FsContentStore::new(&config.storage_root),
            config.transcoder.clone(),
            cancel.signal(),
        );
        Ok(Self {
            config,
            service,
            cancel,
        })
    }

    /// Serve a caller-built service instead of the on-disk default.
    pub fn with_service(config: ServerConfig, service: RingtoneService) -> Self {
        Self {
            config,
            service,
            cancel: Arc::new(CancelHandle::new()),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.service.clone(), self.config.max_upload_bytes)
    }

    /// Serve until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        self.serve_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Serve until `shutdown` resolves. Running transcodes are cancelled as
    /// soon as shutdown begins; in-flight requests then drain.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %listener.local_addr()?,
            storage_root = %self.config.storage_root.display(),
            transcoder = %self.config.transcoder.program.display(),
            "ringcut server listening"
        );

        let cancel = Arc::clone(&self.cancel);
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("shutting down, cancelling running transcodes");
                cancel.cancel();
            })
            .await?;
        Ok(())
    }
}
