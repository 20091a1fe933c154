use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Multipart, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use ringcut_service::RingtoneService;
use ringcut_types::{ContentHash, ConversionRequest};

use crate::envelope::Envelope;
use crate::error::{ServerError, ServerResult};

/// Multipart field carrying the upload.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub hash: ContentHash,
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub hash: Option<String>,
}

/// Health check response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

pub async fn ping_handler() -> &'static str {
    "pong"
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

pub async fn upload_handler(
    State(service): State<RingtoneService>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ServerResult<Envelope<UploadResponse>> {
    let mut multipart = multipart.map_err(|e| ServerError::Rejected {
        status: StatusCode::UNPROCESSABLE_ENTITY,
        message: format!("upload file failed: {}", e.body_text()),
    })?;

    while let Some(field) = multipart.next_field().await.map_err(|e| ServerError::Rejected {
        status: e.status(),
        message: format!("upload file failed: {}", e.body_text()),
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let mime = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|e| ServerError::Rejected {
            status: e.status(),
            message: format!("upload file failed: {}", e.body_text()),
        })?;
        let hash = service.ingest(data, &mime).await?;
        return Ok(Envelope::ok(UploadResponse { hash }));
    }

    Err(ServerError::Validation(format!(
        "upload file failed: missing multipart field {UPLOAD_FIELD:?}"
    )))
}

pub async fn convert_handler(
    State(service): State<RingtoneService>,
    body: Result<Json<ConversionRequest>, JsonRejection>,
) -> ServerResult<Envelope<ConversionRequest>> {
    let Json(request) = body.map_err(|e| ServerError::Rejected {
        status: e.status(),
        message: format!("decode body failed: {}", e.body_text()),
    })?;
    let accepted = service.convert(request).await?;
    Ok(Envelope::ok(accepted))
}

pub async fn download_handler(
    State(service): State<RingtoneService>,
    query: Result<Query<DownloadQuery>, QueryRejection>,
) -> ServerResult<Response> {
    let Query(query) = query.map_err(|e| ServerError::Rejected {
        status: e.status(),
        message: e.body_text(),
    })?;
    let hash = match query.hash.as_deref() {
        None | Some("") => return Err(ServerError::Validation("hash is required".into())),
        Some(raw) => raw
            .parse::<ContentHash>()
            .map_err(|e| ServerError::Validation(e.to_string()))?,
    };

    let artifact = service.retrieve(&hash).await?;
    let headers = [
        (header::CONTENT_TYPE, artifact.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={}", artifact.file_name()),
        ),
        (header::CONTENT_LENGTH, artifact.len().to_string()),
    ];
    Ok((headers, artifact.bytes).into_response())
}

pub async fn not_found_handler() -> ServerError {
    ServerError::RouteNotFound
}

pub async fn method_not_allowed_handler() -> ServerError {
    ServerError::MethodNotAllowed
}
