//! Recommendation pipeline: orchestrates the user-profile and content
//! breakers, falling back to trending when content is unavailable.

use crate::responses::{Movie, RecommendationResponse, UserPreferences, DEFAULT_PREFERENCES};
use recommend_core::{CallError, CircuitBreaker, DefaultCircuitBreaker, UpstreamClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

const USER_PROFILE_DEADLINE: Duration = Duration::from_secs(3);
const CONTENT_DEADLINE: Duration = Duration::from_secs(3);
const TRENDING_DEADLINE: Duration = Duration::from_secs(5);

/// Orchestrates one `GET /recommendations/{userId}` request end to end.
pub struct Pipeline {
    user_profile_breaker: Arc<DefaultCircuitBreaker<serde_json::Value, CallError>>,
    content_breaker: Arc<DefaultCircuitBreaker<serde_json::Value, CallError>>,
    caller: Arc<dyn UpstreamClient>,
    user_profile_url: String,
    content_url: String,
    trending_url: String,
}

impl Pipeline {
    pub fn new(
        user_profile_breaker: Arc<DefaultCircuitBreaker<serde_json::Value, CallError>>,
        content_breaker: Arc<DefaultCircuitBreaker<serde_json::Value, CallError>>,
        caller: Arc<dyn UpstreamClient>,
        user_profile_url: String,
        content_url: String,
        trending_url: String,
    ) -> Self {
        Self {
            user_profile_breaker,
            content_breaker,
            caller,
            user_profile_url,
            content_url,
            trending_url,
        }
    }

    pub async fn recommend(&self, user_id: &str) -> RecommendationResponse {
        let mut fallbacks_triggered = Vec::new();

        let user_preferences = self
            .resolve_user_preferences(user_id, &mut fallbacks_triggered)
            .await;
        let recommendations = self
            .resolve_content(&user_preferences.preferences, &mut fallbacks_triggered)
            .await;

        match recommendations {
            Some(recommendations) => RecommendationResponse::Normal {
                user_preferences,
                recommendations,
                fallback_triggered_for: if fallbacks_triggered.is_empty() {
                    None
                } else {
                    Some(fallbacks_triggered.join(", "))
                },
            },
            None => self.trending_fallback(fallbacks_triggered).await,
        }
    }

    /// Step A: resolve the caller's genre preferences, substituting the
    /// fixed defaults if the user-profile service is unavailable.
    async fn resolve_user_preferences(
        &self,
        user_id: &str,
        fallbacks_triggered: &mut Vec<String>,
    ) -> UserPreferences {
        let url = format!("{}/users/{}", self.user_profile_url, user_id);
        let caller = self.caller.clone();
        let result = self
            .user_profile_breaker
            .call(|| async move { caller.get(&url, USER_PROFILE_DEADLINE).await })
            .await;

        match result {
            Ok(body) => UserPreferences {
                user_id: body
                    .get("userId")
                    .and_then(|v| v.as_str())
                    .unwrap_or(user_id)
                    .to_string(),
                preferences: body
                    .get("preferences")
                    .and_then(|v| v.as_array())
                    .map(|values| {
                        values
                            .iter()
                            .filter_map(|v| v.as_str().map(String::from))
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            Err(error) => {
                warn!(user_id, error = %error, "user-profile call failed, substituting defaults");
                fallbacks_triggered.push("user-profile-service".to_string());
                UserPreferences {
                    user_id: user_id.to_string(),
                    preferences: DEFAULT_PREFERENCES.iter().map(|s| s.to_string()).collect(),
                }
            }
        }
    }

    /// Step B: resolve recommended movies for the given genres. `None` means
    /// the content service was unavailable and Step C should run.
    async fn resolve_content(
        &self,
        preferences: &[String],
        fallbacks_triggered: &mut Vec<String>,
    ) -> Option<Vec<Movie>> {
        let mut url = match reqwest::Url::parse(&format!("{}/movies", self.content_url)) {
            Ok(url) => url,
            Err(error) => {
                warn!(error = %error, "malformed content service URL, falling back to trending");
                fallbacks_triggered.push("content-service".to_string());
                return None;
            }
        };
        url.query_pairs_mut().append_pair("genres", &preferences.join(","));
        let url = url.to_string();

        let caller = self.caller.clone();
        let result = self
            .content_breaker
            .call(|| async move { caller.get(&url, CONTENT_DEADLINE).await })
            .await;

        match result {
            Ok(body) => Some(extract_movies(&body, "movies")),
            Err(error) => {
                warn!(error = %error, "content call failed, falling back to trending");
                fallbacks_triggered.push("content-service".to_string());
                None
            }
        }
    }

    /// Step C: the terminal trending fallback, called directly with no
    /// breaker protection.
    async fn trending_fallback(&self, fallbacks_triggered: Vec<String>) -> RecommendationResponse {
        let fallback_triggered_for = fallbacks_triggered.join(", ");
        let url = format!("{}/trending", self.trending_url);

        match self.caller.get(&url, TRENDING_DEADLINE).await {
            Ok(body) => RecommendationResponse::TrendingFallback {
                trending: extract_movies(&body, "trending"),
                fallback_triggered_for,
            },
            Err(error) => {
                warn!(error = %error, "trending fallback failed, all upstreams unavailable");
                RecommendationResponse::AllUnavailable {
                    fallback_triggered_for,
                }
            }
        }
    }
}

fn extract_movies(body: &serde_json::Value, field: &str) -> Vec<Movie> {
    body.get(field)
        .and_then(|v| v.as_array())
        .map(|values| {
            values
                .iter()
                .filter_map(|v| serde_json::from_value::<Movie>(v.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
