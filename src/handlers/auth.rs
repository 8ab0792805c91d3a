use crate::{auth, db, error::ApiError, models::UserProfile, AppState};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ── Request / response types ───────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    email: String,
    password: String,
    display_name: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    token: String,
    user: UserProfile,
}

// ── Handlers ───────────────────────────────────────────────────────────────

/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = body.email.trim().to_owned();
    if !email.contains('@') {
        return Err(ApiError::Validation("email must contain '@'".into()));
    }
    if body.password.len() < 6 {
        return Err(ApiError::Validation(
            "password must be at least 6 characters".into(),
        ));
    }

    // Fall back to the email local part when no display name was given.
    let display_name = body
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_owned());

    let password_hash = auth::hash_password(&body.password)?;

    let user = match db::create_user(&state.db, &email, &password_hash, &display_name).await {
        Ok(user) => user,
        Err(e) if e.to_string().contains("UNIQUE") => {
            return Err(ApiError::Conflict("email already registered".into()));
        }
        Err(e) => return Err(e.into()),
    };

    let token = state.sessions.create(user.id).await;
    tracing::info!("Registered user {} ({})", user.id, user.email);

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let user = db::get_user_by_email(&state.db, body.email.trim()).await?;

    let valid = user
        .as_ref()
        .map(|u| auth::verify_password(&body.password, &u.password_hash))
        .unwrap_or(false);

    let Some(user) = user.filter(|_| valid) else {
        // Small artificial delay to blunt brute-force attempts; one message
        // for unknown email and wrong password alike.
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        return Err(ApiError::InvalidCredentials);
    };

    let token = state.sessions.create(user.id).await;

    Ok(Json(SessionResponse {
        token,
        user: user.into(),
    }))
}

/// POST /auth/logout
///
/// Best-effort: an unknown or absent token still gets a 204 so clients can
/// always clear local state.
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        state.sessions.remove(token).await;
    }

    StatusCode::NO_CONTENT
}
