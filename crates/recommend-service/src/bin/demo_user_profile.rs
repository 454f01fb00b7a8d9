//! Demo user-profile upstream.
//!
//! `GET /users/{id}` normally returns a fixed preference list. Pass
//! `?fail=true` to force a 500, or `?delay_ms=N` to simulate a slow
//! response — both are query-string toggles, not a real simulate API.

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct SimulateParams {
    fail: Option<bool>,
    delay_ms: Option<u64>,
}

async fn get_user(
    Path(user_id): Path<String>,
    Query(params): Query<SimulateParams>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    if let Some(delay_ms) = params.delay_ms {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
    if params.fail.unwrap_or(false) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    Ok(Json(serde_json::json!({
        "userId": user_id,
        "preferences": ["Action", "Sci-Fi"],
    })))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let app = Router::new().route("/users/{id}", get(get_user));
    let port: u16 = std::env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(8081);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await.unwrap();
    tracing::info!("demo user-profile service listening on :{port}");
    axum::serve(listener, app).await.unwrap();
}
