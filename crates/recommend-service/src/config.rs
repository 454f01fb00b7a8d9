//! Configuration for the recommendation service.
//!
//! Loaded from environment variables (optionally via a `.env` file through
//! `dotenvy`), with `Default` providing every value spec.md §6 requires.

use serde::{Deserialize, Serialize};

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendConfig {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// Base URLs of the three upstream dependencies.
    pub upstreams: UpstreamsConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl RecommendConfig {
    /// Build configuration from environment variables, falling back to
    /// spec.md §6 defaults for anything unset.
    ///
    /// Reads an optional `.env` file first (via `dotenvy`), matching the
    /// teacher's convention of loading configuration before validating it.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Ok(port) = std::env::var("API_PORT") {
            if let Ok(port) = port.parse() {
                config.server.port = port;
            }
        }
        if let Ok(url) = std::env::var("USER_PROFILE_URL") {
            config.upstreams.user_profile_url = url;
        }
        if let Ok(url) = std::env::var("CONTENT_URL") {
            config.upstreams.content_url = url;
        }
        if let Ok(url) = std::env::var("TRENDING_URL") {
            config.upstreams.trending_url = url;
        }
        if let Ok(level) = std::env::var("RUST_LOG") {
            config.logging.level = level;
        }

        config
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_seconds: 30,
        }
    }
}

/// Base URLs of the three upstream dependencies (spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamsConfig {
    pub user_profile_url: String,
    pub content_url: String,
    pub trending_url: String,
}

impl Default for UpstreamsConfig {
    fn default() -> Self {
        Self {
            user_profile_url: "http://localhost:8081".to_string(),
            content_url: "http://localhost:8082".to_string(),
            trending_url: "http://localhost:8083".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
