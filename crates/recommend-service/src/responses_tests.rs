use super::*;

#[test]
fn normal_response_omits_fallback_field_when_absent() {
    let response = RecommendationResponse::Normal {
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
    };

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "userPreferences": {"userId": "u1", "preferences": ["Action", "Sci-Fi"]},
            "recommendations": [{"movieId": 102, "title": "The Dark Knight", "genre": "Action"}],
        })
    );
}

#[test]
fn normal_response_includes_fallback_field_when_present() {
    let response = RecommendationResponse::Normal {
        user_preferences: UserPreferences {
            user_id: "u1".to_string(),
            preferences: vec!["Comedy".to_string(), "Family".to_string()],
        },
        recommendations: vec![],
        fallback_triggered_for: Some("user-profile-service".to_string()),
    };

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["fallback_triggered_for"], "user-profile-service");
}

#[test]
fn trending_fallback_response_shape() {
    let response = RecommendationResponse::TrendingFallback {
        trending: vec![Movie {
            movie_id: 1,
            title: "Popular".to_string(),
            genre: "Drama".to_string(),
        }],
        fallback_triggered_for: "user-profile-service, content-service".to_string(),
    };

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["message"], DEGRADED_MESSAGE);
    assert_eq!(
        json["fallback_triggered_for"],
        "user-profile-service, content-service"
    );
    assert!(json["trending"].is_array());
}

#[test]
fn all_unavailable_response_shape() {
    let response = RecommendationResponse::AllUnavailable {
        fallback_triggered_for: "user-profile-service, content-service".to_string(),
    };

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["error"], ALL_DOWN_MESSAGE);
    assert_eq!(
        json["fallback_triggered_for"],
        "user-profile-service, content-service"
    );
}
