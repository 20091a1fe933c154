use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use ringcut_service::RingtoneService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handler;

/// HTTP endpoint paths.
pub mod endpoints {
    pub const PING: &str = "/ping";
    pub const UPLOAD: &str = "/upload";
    pub const CONVERT: &str = "/convert";
    pub const DOWNLOAD: &str = "/download";
    pub const HEALTH: &str = "/v1/health";
}

/// Build the axum router with all ringcut endpoints.
pub fn build_router(service: RingtoneService, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([
            Method::POST,
            Method::GET,
            Method::OPTIONS,
            Method::PUT,
            Method::DELETE,
        ]);

    Router::new()
        .route(
            endpoints::PING,
            get(handler::ping_handler).fallback(handler::method_not_allowed_handler),
        )
        .route(
            endpoints::HEALTH,
            get(handler::health_handler).fallback(handler::method_not_allowed_handler),
        )
        .route(
            endpoints::UPLOAD,
            post(handler::upload_handler).fallback(handler::method_not_allowed_handler),
        )
        .route(
            endpoints::CONVERT,
            post(handler::convert_handler).fallback(handler::method_not_allowed_handler),
        )
        .route(
            endpoints::DOWNLOAD,
            get(handler::download_handler).fallback(handler::method_not_allowed_handler),
        )
        .fallback(handler::not_found_handler)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(service)
}
