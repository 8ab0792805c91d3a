use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection string, e.g. "sqlite:./carnet.db"
    pub database_url: String,

    /// Host to bind the HTTP server to, e.g. "0.0.0.0"
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// How many recent photos the aggregation views work on. Older photos
    /// stay stored but fall outside the map and statistics.
    pub photo_fetch_limit: u32,

    /// How many hours a session token remains valid
    pub session_duration_hours: u64,

    /// Base URL of the reverse-geocoding service (Nominatim-compatible).
    /// Must NOT have a trailing slash.
    pub geocoder_url: String,
}

impl AppConfig {
    /// Load configuration from environment variables (populated by dotenvy before this is called).
    pub fn from_env() -> Result<Self> {
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse::<u16>()
            .context("PORT must be a valid port number (1–65535)")?;

        let photo_fetch_limit = std::env::var("PHOTO_FETCH_LIMIT")
            .unwrap_or_else(|_| "50".into())
            .parse::<u32>()
            .context("PHOTO_FETCH_LIMIT must be a positive integer")?;

        let session_duration_hours = std::env::var("SESSION_DURATION_HOURS")
            .unwrap_or_else(|_| "720".into())
            .parse::<u64>()
            .unwrap_or(720);

        let geocoder_url = std::env::var("GEOCODER_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".into())
            .trim_end_matches('/')
            .to_owned();

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./carnet.db".into()),
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            photo_fetch_limit,
            session_duration_hours,
            geocoder_url,
        })
    }
}
