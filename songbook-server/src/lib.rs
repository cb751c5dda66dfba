//! songbook-server library - song catalog REST backend
//!
//! CRUD endpoints over song records plus an aggregate statistics endpoint.

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use songbook_common::Error;
use sqlx::SqlitePool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, opened at startup and closed on shutdown
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, put};

    let songs = Router::new()
        .route("/api/songs", get(api::list_songs).post(api::create_song))
        .route("/api/songs/stats/summary", get(api::stats_summary))
        .route("/api/songs/:id", put(api::update_song).delete(api::delete_song));

    Router::new()
        .merge(songs)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy for the given origins; an empty list allows any origin
pub fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, Error> {
    if allowed_origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| Error::Config(format!("Invalid allowed origin: {}", origin)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]))
}
