//! HTTP server for ringcut.
//!
//! A thin axum layer over [`RingtoneService`](ringcut_service::RingtoneService):
//! multipart upload, JSON conversion requests, and ringtone download. Every
//! JSON response uses the [`Envelope`] shape.

pub mod config;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use envelope::Envelope;
pub use error::{ServerError, ServerResult};
pub use handler::{HealthResponse, UploadResponse};
pub use server::RingcutServer;
