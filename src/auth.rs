use crate::{error::ApiError, AppState};
use argon2::Argon2;
use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;
use uuid::Uuid;

// ── Session store ──────────────────────────────────────────────────────────

struct Session {
    user_id: i64,
    created_at: Instant,
}

/// In-memory session store. Each entry maps a session token (UUID) to its
/// owning user and creation instant. Tokens expire after `session_duration`.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    session_duration: Duration,
}

impl SessionStore {
    pub fn new(session_duration_hours: u64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            session_duration: Duration::from_secs(session_duration_hours * 3600),
        }
    }

    /// Create a new session for the user and return its token.
    pub async fn create(&self, user_id: i64) -> String {
        let token = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;
        // Opportunistically prune expired sessions on every login
        sessions.retain(|_, session| session.created_at.elapsed() < self.session_duration);
        sessions.insert(
            token.clone(),
            Session {
                user_id,
                created_at: Instant::now(),
            },
        );
        token
    }

    /// Return the owning user if the token exists and has not expired.
    pub async fn user_for(&self, token: &str) -> Option<i64> {
        let sessions = self.sessions.read().await;
        sessions
            .get(token)
            .filter(|session| session.created_at.elapsed() < self.session_duration)
            .map(|session| session.user_id)
    }

    /// Invalidate a specific session (logout).
    pub async fn remove(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token);
    }
}

// ── Passwords ──────────────────────────────────────────────────────────────

/// Hash a password into a PHC string for storage.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| ApiError::Credentials)?;
    Ok(hash.to_string())
}

/// Check a candidate password against a stored PHC string.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

// ── AuthUser extractor ─────────────────────────────────────────────────────

/// Extractor that enforces authentication on any handler that includes it as
/// a parameter. The request must carry `Authorization: Bearer <token>` with
/// a live session token; otherwise the handler never runs and the client
/// gets a 401.
pub struct AuthUser(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = Arc::<AppState>::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized)?;

        match state.sessions.user_for(token).await {
            Some(user_id) => Ok(AuthUser(user_id)),
            None => Err(ApiError::Unauthorized),
        }
    }
}
