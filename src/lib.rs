use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub mod address;
pub mod aggregate;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod geo;
pub mod geocode;
pub mod handlers;
pub mod journal;
pub mod models;
pub mod store;

use auth::SessionStore;
use config::AppConfig;
use geocode::AddressCache;
use journal::Journal;

/// Embedded migrations, shared by the binary and the integration tests.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

// ── Shared application state ───────────────────────────────────────────────

pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub config: AppConfig,
    pub sessions: SessionStore,
    pub journal: Journal,
    /// In-memory cache for geo-key → address lookups so the same spot is
    /// never looked up more than once per server lifetime.
    pub geo_cache: AddressCache,
}

// ── Router ─────────────────────────────────────────────────────────────────

/// Build the full application router on top of the shared state.
pub fn app(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route(
            "/photos",
            post(handlers::photos::create_photo).get(handlers::photos::list_photos),
        )
        .route("/photos/calendar", get(handlers::photos::calendar))
        .route("/photos/:id", delete(handlers::photos::delete_photo))
        .route("/map/pins", get(handlers::map::pins))
        .route(
            "/profile",
            get(handlers::profile::profile).patch(handlers::profile::update_profile),
        )
        .route("/profile/stats", get(handlers::profile::stats))
        .route("/geocode", get(handlers::geocode::reverse));

    Router::new()
        // Liveness check, no auth required.
        .route("/health", get(|| async { StatusCode::OK }))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        // Journal API (all under /api/*, session-guarded per handler)
        .nest("/api", api_router)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
