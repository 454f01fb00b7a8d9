use super::*;

#[test]
fn default_server_config_matches_spec_defaults() {
    let config = RecommendConfig::default();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.host, "0.0.0.0");
}

#[test]
fn default_upstream_urls_are_distinct() {
    let config = RecommendConfig::default();
    assert_ne!(config.upstreams.user_profile_url, config.upstreams.content_url);
    assert_ne!(config.upstreams.content_url, config.upstreams.trending_url);
}

// `from_env` reads process-global environment variables, so these cases
// share one test to avoid racing other tests' env var mutations.
#[test]
fn from_env_reads_and_validates_overrides() {
    std::env::set_var("API_PORT", "9999");
    std::env::set_var("USER_PROFILE_URL", "http://example.test:1");
    std::env::set_var("CONTENT_URL", "http://example.test:2");
    std::env::set_var("TRENDING_URL", "http://example.test:3");

    let config = RecommendConfig::from_env();
    assert_eq!(config.server.port, 9999);
    assert_eq!(config.upstreams.user_profile_url, "http://example.test:1");
    assert_eq!(config.upstreams.content_url, "http://example.test:2");
    assert_eq!(config.upstreams.trending_url, "http://example.test:3");

    std::env::set_var("API_PORT", "not-a-number");
    let config = RecommendConfig::from_env();
    assert_eq!(config.server.port, 8080);

    std::env::remove_var("API_PORT");
    std::env::remove_var("USER_PROFILE_URL");
    std::env::remove_var("CONTENT_URL");
    std::env::remove_var("TRENDING_URL");
}
