use super::*;
use recommend_core::{BreakerConfig, FakeClock, ReqwestUpstreamClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

type BreakerPair = (
    Arc<DefaultCircuitBreaker<serde_json::Value, CallError>>,
    Arc<DefaultCircuitBreaker<serde_json::Value, CallError>>,
);

fn breakers(clock: FakeClock) -> BreakerPair {
    let clock: Arc<dyn recommend_core::Clock> = Arc::new(clock);
    (
        Arc::new(DefaultCircuitBreaker::new(
            BreakerConfig::new("user-profile"),
            clock.clone(),
        )),
        Arc::new(DefaultCircuitBreaker::new(
            BreakerConfig::new("content"),
            clock,
        )),
    )
}

fn caller() -> Arc<dyn UpstreamClient> {
    Arc::new(ReqwestUpstreamClient::new(reqwest::Client::new()))
}

#[tokio::test]
async fn happy_path_returns_normal_response_with_no_fallback() {
    let user_profile = MockServer::start().await;
    let content = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "userId": "u1",
            "preferences": ["Action", "Sci-Fi"],
        })))
        .mount(&user_profile)
        .await;
    Mock::given(method("GET"))
        .and(path("/movies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "movies": [{"movieId": 102, "title": "The Dark Knight", "genre": "Action"}],
        })))
        .mount(&content)
        .await;

    let (user_profile_breaker, content_breaker) = breakers(FakeClock::new());
    let pipeline = Pipeline::new(
        user_profile_breaker,
        content_breaker,
        caller(),
        user_profile.uri(),
        content.uri(),
        "http://unused.invalid".to_string(),
    );

    let response = pipeline.recommend("u1").await;
    assert_eq!(
        response,
        RecommendationResponse::Normal {
            user_preferences: UserPreferences {
                user_id: "u1".to_string(),
                preferences: vec!["Action".to_string(), "Sci-Fi".to_string()],
            },
            recommendations: vec![Movie {
                movie_id: 102,
                title: "The Dark Knight".to_string(),
                genre: "Action".to_string(),
            }],
            fallback_triggered_for: None,
        }
    );
}

#[tokio::test]
async fn user_profile_down_falls_back_to_defaults_but_content_still_resolves() {
    let user_profile = MockServer::start().await;
    let content = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&user_profile)
        .await;
    Mock::given(method("GET"))
        .and(path("/movies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "movies": [{"movieId": 7, "title": "Comedy Night", "genre": "Comedy"}],
        })))
        .mount(&content)
        .await;

    let (user_profile_breaker, content_breaker) = breakers(FakeClock::new());
    let pipeline = Pipeline::new(
        user_profile_breaker.clone(),
        content_breaker,
        caller(),
        user_profile.uri(),
        content.uri(),
        "http://unused.invalid".to_string(),
    );

    for _ in 0..5 {
        let _ = pipeline.recommend("u1").await;
    }
    assert_eq!(
        user_profile_breaker.current_state(),
        recommend_core::CircuitState::Open
    );

    let response = pipeline.recommend("u1").await;
    match response {
        RecommendationResponse::Normal {
            user_preferences,
            fallback_triggered_for,
            ..
        } => {
            assert_eq!(user_preferences.preferences, vec!["Comedy", "Family"]);
            assert_eq!(fallback_triggered_for, Some("user-profile-service".to_string()));
        }
        other => panic!("expected Normal response, got {other:?}"),
    }
}

#[tokio::test]
async fn both_breakers_open_falls_back_to_trending() {
    let user_profile = MockServer::start().await;
    let content = MockServer::start().await;
    let trending = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&user_profile)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&content)
        .await;
    Mock::given(method("GET"))
        .and(path("/trending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "trending": [{"movieId": 1, "title": "Popular", "genre": "Drama"}],
        })))
        .mount(&trending)
        .await;

    let (user_profile_breaker, content_breaker) = breakers(FakeClock::new());
    let pipeline = Pipeline::new(
        user_profile_breaker,
        content_breaker,
        caller(),
        user_profile.uri(),
        content.uri(),
        trending.uri(),
    );

    for _ in 0..5 {
        let _ = pipeline.recommend("u1").await;
    }

    let response = pipeline.recommend("u1").await;
    match response {
        RecommendationResponse::TrendingFallback {
            trending,
            fallback_triggered_for,
        } => {
            assert_eq!(trending.len(), 1);
            assert_eq!(
                fallback_triggered_for,
                "user-profile-service, content-service"
            );
        }
        other => panic!("expected TrendingFallback response, got {other:?}"),
    }
}

#[tokio::test]
async fn all_three_upstreams_down_returns_all_unavailable() {
    let user_profile = MockServer::start().await;
    let content = MockServer::start().await;
    let trending = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&user_profile)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&content)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&trending)
        .await;

    let (user_profile_breaker, content_breaker) = breakers(FakeClock::new());
    let pipeline = Pipeline::new(
        user_profile_breaker,
        content_breaker,
        caller(),
        user_profile.uri(),
        content.uri(),
        trending.uri(),
    );

    for _ in 0..5 {
        let _ = pipeline.recommend("u1").await;
    }

    let response = pipeline.recommend("u1").await;
    assert_eq!(
        response,
        RecommendationResponse::AllUnavailable {
            fallback_triggered_for: "user-profile-service, content-service".to_string(),
        }
    );
}
