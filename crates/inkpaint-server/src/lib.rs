//! InkPaint Server
//!
//! JSON API for accounts and saved drawings, plus the static web client.
//!
//! ## Routes
//!
//! ```text
//! POST   /api/auth/register   {username, email, password}
//! POST   /api/auth/login      {username, password} -> {token, user}
//! GET    /api/auth/verify     (bearer)
//! POST   /api/drawings        (bearer) {name, data}
//! GET    /api/drawings        (bearer)
//! GET    /api/drawings/{id}   (bearer)
//! DELETE /api/drawings/{id}   (bearer)
//! ```
//!
//! Any other path is answered from the static directory, falling back to
//! its `index.html`.

pub mod auth;
pub mod config;
pub mod db;
pub mod drawings;
pub mod error;
pub mod middleware;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use db::Database;
pub use error::ApiError;

/// Largest accepted request body (drawings travel as base64 PNG).
pub const BODY_LIMIT: usize = 50 * 1024 * 1024;

/// Shared application state
pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub config: Config,
}

impl AppStateInner {
    pub fn new(db: Database, config: Config) -> AppState {
        Arc::new(Self { db, config })
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let protected_routes = Router::new()
        .route("/auth/verify", get(auth::verify))
        .route("/drawings", get(drawings::list).post(drawings::create))
        .route(
            "/drawings/{id}",
            get(drawings::get).delete(drawings::delete),
        )
        .route_layer(from_fn_with_state(state.clone(), middleware::require_auth));

    let mut app = Router::new().nest("/api", public_routes.merge(protected_routes));

    if let Some(dir) = &state.config.static_dir {
        let index = ServeFile::new(dir.join("index.html"));
        app = app.fallback_service(ServeDir::new(dir).fallback(index));
    }

    app.layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
