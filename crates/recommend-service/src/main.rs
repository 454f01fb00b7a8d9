//! Process entry point: load configuration, wire up tracing, run the server.

use recommend_service::{start_server, RecommendConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let config = RecommendConfig::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(error) = start_server(config).await {
        tracing::error!(error = %error, "recommendation service exited with an error");
        std::process::exit(1);
    }
}
