//! Error types for the HTTP service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

/// Service-level errors: things that go wrong starting or running the
/// server itself, not processing an individual request.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to bind to address {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("server failed: {message}")]
    ServerFailed { message: String },
}

/// 404 fallback for any route the router does not recognize.
pub async fn not_found(method: axum::http::Method, uri: axum::http::Uri) -> Response {
    let body = serde_json::json!({
        "error": format!("Route {method} {uri} not found"),
    });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}
