//! Response types returned by the recommendation HTTP surface.

use serde::{Deserialize, Serialize};

/// Echoed user preferences, either resolved from the user-profile service or
/// substituted with the fixed defaults when that call fails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserPreferences {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub preferences: Vec<String>,
}

/// A single recommended (or trending) movie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    #[serde(rename = "movieId")]
    pub movie_id: i64,
    pub title: String,
    pub genre: String,
}

/// Genre preferences substituted when the user-profile call fails.
pub const DEFAULT_PREFERENCES: &[&str] = &["Comedy", "Family"];

/// Fixed message shown when the pipeline degrades to the trending fallback.
pub const DEGRADED_MESSAGE: &str =
    "Our recommendation service is temporarily degraded. Here are some trending movies.";

/// Fixed message shown when every upstream in the pipeline is unavailable.
pub const ALL_DOWN_MESSAGE: &str = "All services are currently unavailable. Please try again shortly.";

/// Response body for `GET /recommendations/{userId}`.
///
/// The three success shapes and the 503 failure shape share a handler but
/// serialize with different field sets, so each variant is emitted with its
/// own explicit shape rather than one struct with always-present fields.
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationResponse {
    /// Step D: content resolved normally.
    Normal {
        user_preferences: UserPreferences,
        recommendations: Vec<Movie>,
        fallback_triggered_for: Option<String>,
    },
    /// Step C success: content was unavailable, trending filled in.
    TrendingFallback {
        trending: Vec<Movie>,
        fallback_triggered_for: String,
    },
    /// Step C failure: every upstream is unavailable.
    AllUnavailable { fallback_triggered_for: String },
}

impl Serialize for RecommendationResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        match self {
            Self::Normal {
                user_preferences,
                recommendations,
                fallback_triggered_for,
            } => {
                let len = if fallback_triggered_for.is_some() { 3 } else { 2 };
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("userPreferences", user_preferences)?;
                map.serialize_entry("recommendations", recommendations)?;
                if let Some(fallback) = fallback_triggered_for {
                    map.serialize_entry("fallback_triggered_for", fallback)?;
                }
                map.end()
            }
            Self::TrendingFallback {
                trending,
                fallback_triggered_for,
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("message", DEGRADED_MESSAGE)?;
                map.serialize_entry("trending", trending)?;
                map.serialize_entry("fallback_triggered_for", fallback_triggered_for)?;
                map.end()
            }
            Self::AllUnavailable {
                fallback_triggered_for,
            } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("error", ALL_DOWN_MESSAGE)?;
                map.serialize_entry("fallback_triggered_for", fallback_triggered_for)?;
                map.end()
            }
        }
    }
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "healthy",
            service: "recommendation-service",
        }
    }
}

/// Response body for `POST /admin/reset-circuit-breakers`.
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub message: &'static str,
}

impl Default for ResetResponse {
    fn default() -> Self {
        Self {
            message: "All circuit breakers reset to CLOSED",
        }
    }
}

#[cfg(test)]
#[path = "responses_tests.rs"]
mod tests;
