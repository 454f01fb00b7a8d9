//! Demo content-catalog upstream.
//!
//! `GET /movies?genres=csv` returns movies matching any of the requested
//! genres. `?fail=true` and `?delay_ms=N` behave as in the other demo
//! services.

use axum::{extract::Query, http::StatusCode, response::Json, routing::get, Router};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct MoviesParams {
    genres: Option<String>,
    fail: Option<bool>,
    delay_ms: Option<u64>,
}

#[derive(Debug, serde::Serialize, Clone)]
struct CatalogMovie {
    #[serde(rename = "movieId")]
    movie_id: i64,
    title: String,
    genre: String,
}

fn catalog() -> Vec<CatalogMovie> {
    vec![
        CatalogMovie { movie_id: 101, title: "Mad Max: Fury Road".to_string(), genre: "Action".to_string() },
        CatalogMovie { movie_id: 102, title: "The Dark Knight".to_string(), genre: "Action".to_string() },
        CatalogMovie { movie_id: 201, title: "Arrival".to_string(), genre: "Sci-Fi".to_string() },
        CatalogMovie { movie_id: 301, title: "The Grand Budapest Hotel".to_string(), genre: "Comedy".to_string() },
        CatalogMovie { movie_id: 401, title: "Paddington 2".to_string(), genre: "Family".to_string() },
    ]
}

async fn get_movies(Query(params): Query<MoviesParams>) -> Result<Json<serde_json::Value>, StatusCode> {
    if let Some(delay_ms) = params.delay_ms {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
    if params.fail.unwrap_or(false) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let genres: Vec<&str> = params
        .genres
        .as_deref()
        .map(|csv| csv.split(',').collect())
        .unwrap_or_default();

    let movies: Vec<CatalogMovie> = catalog()
        .into_iter()
        .filter(|movie| genres.is_empty() || genres.contains(&movie.genre.as_str()))
        .collect();

    Ok(Json(serde_json::json!({ "movies": movies })))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let app = Router::new().route("/movies", get(get_movies));
    let port: u16 = std::env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(8082);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await.unwrap();
    tracing::info!("demo content service listening on :{port}");
    axum::serve(listener, app).await.unwrap();
}
