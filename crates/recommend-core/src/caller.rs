//! Outbound caller: a single GET to one upstream, under a deadline.
//!
//! No retries live here — retry is a caller policy the circuit breaker and
//! pipeline deliberately leave out (spec.md §1 non-goals).

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Failure classification for a single outbound call.
#[derive(Debug, Error)]
pub enum CallError {
    /// Connection, DNS, or socket-level failure.
    #[error("transport error calling {url}: {message}")]
    Transport { url: String, message: String },

    /// Upstream responded with a non-2xx status.
    #[error("upstream {url} returned status {status}")]
    Upstream { url: String, status: u16 },

    /// The call did not complete within `deadline`.
    #[error("call to {url} exceeded deadline of {deadline_ms}ms")]
    Timeout { url: String, deadline_ms: u64 },
}

/// Issues a single outbound GET with a deadline and returns the parsed JSON
/// body, or a typed failure.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn get(&self, url: &str, deadline: Duration) -> Result<serde_json::Value, CallError>;
}

/// Production `UpstreamClient` backed by a shared `reqwest::Client`.
pub struct ReqwestUpstreamClient {
    client: reqwest::Client,
}

impl ReqwestUpstreamClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UpstreamClient for ReqwestUpstreamClient {
    async fn get(&self, url: &str, deadline: Duration) -> Result<serde_json::Value, CallError> {
        let request = self.client.get(url).send();

        let response = match tokio::time::timeout(deadline, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::debug!(url, error = %e, "transport error calling upstream");
                return Err(CallError::Transport {
                    url: url.to_string(),
                    message: e.to_string(),
                });
            }
            Err(_) => {
                tracing::warn!(url, deadline_ms = deadline.as_millis(), "call to upstream timed out");
                return Err(CallError::Timeout {
                    url: url.to_string(),
                    deadline_ms: deadline.as_millis() as u64,
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "upstream returned non-2xx");
            return Err(CallError::Upstream {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        match response.json::<serde_json::Value>().await {
            Ok(body) => {
                tracing::debug!(url, "upstream call succeeded");
                Ok(body)
            }
            Err(e) => Err(CallError::Transport {
                url: url.to_string(),
                message: format!("failed to parse response body: {e}"),
            }),
        }
    }
}

#[cfg(test)]
#[path = "caller_tests.rs"]
mod tests;
