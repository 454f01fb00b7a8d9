//! # Recommendation Service
//!
//! HTTP surface for the fault-tolerant recommendation aggregation service.
//!
//! This crate provides:
//! - `GET /recommendations/{userId}`, composing the user-profile and content
//!   breakers with a terminal trending fallback.
//! - `GET /metrics/circuit-breakers`, a read-only snapshot of both breakers.
//! - `POST /admin/reset-circuit-breakers`, forcing both back to CLOSED.
//! - `GET /health`, a static liveness check.

pub mod config;
pub mod errors;
pub mod metrics;
pub mod pipeline;
pub mod responses;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use recommend_core::{
    BreakerConfig, CircuitBreaker, CircuitBreakerFactory, DefaultCircuitBreaker,
    DefaultCircuitBreakerFactory, ReqwestUpstreamClient, SystemClock, UpstreamClient,
};
use std::{net::SocketAddr, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument};

pub use config::RecommendConfig;
pub use errors::ServiceError;
pub use metrics::CircuitBreakerSnapshot;
pub use pipeline::Pipeline;
pub use responses::{HealthResponse, RecommendationResponse, ResetResponse};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub user_profile_breaker: Arc<DefaultCircuitBreaker<serde_json::Value, recommend_core::CallError>>,
    pub content_breaker: Arc<DefaultCircuitBreaker<serde_json::Value, recommend_core::CallError>>,
}

impl AppState {
    pub fn new(config: &RecommendConfig) -> Self {
        let clock = Arc::new(SystemClock::new());
        let factory = DefaultCircuitBreakerFactory::new(clock as Arc<dyn recommend_core::Clock>);

        let user_profile_breaker: Arc<DefaultCircuitBreaker<serde_json::Value, recommend_core::CallError>> =
            Arc::new(factory.create_circuit_breaker(BreakerConfig::new("user-profile")));
        let content_breaker: Arc<DefaultCircuitBreaker<serde_json::Value, recommend_core::CallError>> =
            Arc::new(factory.create_circuit_breaker(BreakerConfig::new("content")));

        let caller: Arc<dyn UpstreamClient> = Arc::new(ReqwestUpstreamClient::new(reqwest::Client::new()));

        let pipeline = Arc::new(Pipeline::new(
            user_profile_breaker.clone(),
            content_breaker.clone(),
            caller,
            config.upstreams.user_profile_url.clone(),
            config.upstreams.content_url.clone(),
            config.upstreams.trending_url.clone(),
        ));

        Self {
            pipeline,
            user_profile_breaker,
            content_breaker,
        }
    }
}

/// Build the HTTP router with every route and the ambient middleware stack.
pub fn create_router(state: AppState) -> Router {
    let recommendation_routes =
        Router::new().route("/recommendations/{user_id}", get(handle_recommendations));

    let metrics_routes = Router::new().route("/metrics/circuit-breakers", get(handle_metrics));

    let admin_routes =
        Router::new().route("/admin/reset-circuit-breakers", post(handle_reset_breakers));

    let health_routes = Router::new().route("/health", get(handle_health));

    Router::new()
        .merge(recommendation_routes)
        .merge(metrics_routes)
        .merge(admin_routes)
        .merge(health_routes)
        .fallback(errors::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive())
                .into_inner(),
        )
        .with_state(state)
}

/// Start the HTTP server, serving until a shutdown signal is received.
pub async fn start_server(config: RecommendConfig) -> Result<(), ServiceError> {
    let state = AppState::new(&config);
    let app = create_router(state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    ));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServiceError::BindFailed {
            address: addr.to_string(),
            message: e.to_string(),
        })?;

    info!("starting recommendation service on {}", addr);

    let shutdown_timeout = std::time::Duration::from_secs(config.server.shutdown_timeout_seconds);
    let shutdown_signal = async move {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install Ctrl+C signal handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("received SIGINT, shutting down with {}s grace period", shutdown_timeout.as_secs());
            },
            _ = terminate => {
                info!("received SIGTERM, shutting down with {}s grace period", shutdown_timeout.as_secs());
            },
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ServiceError::ServerFailed {
            message: e.to_string(),
        })?;

    info!("recommendation service shutdown complete");
    Ok(())
}

/// `GET /recommendations/{userId}`
#[instrument(skip(state))]
async fn handle_recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Response {
    let response = state.pipeline.recommend(&user_id).await;
    let status = match &response {
        RecommendationResponse::AllUnavailable { .. } => axum::http::StatusCode::SERVICE_UNAVAILABLE,
        _ => axum::http::StatusCode::OK,
    };
    (status, Json(response)).into_response()
}

/// `GET /metrics/circuit-breakers`
#[instrument(skip(state))]
async fn handle_metrics(State(state): State<AppState>) -> Json<serde_json::Value> {
    let user_profile = CircuitBreakerSnapshot::from_metrics(&state.user_profile_breaker.metrics());
    let content = CircuitBreakerSnapshot::from_metrics(&state.content_breaker.metrics());

    Json(serde_json::json!({
        "userProfileCircuitBreaker": user_profile,
        "contentCircuitBreaker": content,
    }))
}

/// `POST /admin/reset-circuit-breakers`
#[instrument(skip(state))]
async fn handle_reset_breakers(State(state): State<AppState>) -> Json<ResetResponse> {
    state.user_profile_breaker.reset();
    state.content_breaker.reset();
    Json(ResetResponse::default())
}

/// `GET /health`
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
