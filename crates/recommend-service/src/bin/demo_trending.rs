//! Demo trending upstream, the terminal fallback with no breaker in front
//! of it. `GET /trending` returns a fixed popular list; `?fail=true` and
//! `?delay_ms=N` behave as in the other demo services.

use axum::{extract::Query, http::StatusCode, response::Json, routing::get, Router};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct SimulateParams {
    fail: Option<bool>,
    delay_ms: Option<u64>,
}

async fn get_trending(Query(params): Query<SimulateParams>) -> Result<Json<serde_json::Value>, StatusCode> {
    if let Some(delay_ms) = params.delay_ms {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
    if params.fail.unwrap_or(false) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    Ok(Json(serde_json::json!({
        "trending": [
            {"movieId": 1, "title": "Oppenheimer", "genre": "Drama"},
            {"movieId": 2, "title": "Barbie", "genre": "Comedy"},
        ],
    })))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let app = Router::new().route("/trending", get(get_trending));
    let port: u16 = std::env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(8083);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await.unwrap();
    tracing::info!("demo trending service listening on :{port}");
    axum::serve(listener, app).await.unwrap();
}
