use crate::{
    auth::AuthUser,
    db,
    error::ApiError,
    models::{UserProfile, UserStats},
    AppState,
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ── Request / response types ───────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProfileResponse {
    user: UserProfile,
    stats: UserStats,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    display_name: String,
}

// ── Handlers ───────────────────────────────────────────────────────────────

/// GET /api/profile
///
/// Returns the profile together with the last persisted statistics; use
/// GET /api/profile/stats for freshly recomputed figures.
pub async fn profile(
    AuthUser(user_id): AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = db::get_user_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    let stats = user.cached_stats();

    Ok(Json(ProfileResponse {
        user: user.into(),
        stats,
    }))
}

/// PATCH /api/profile
pub async fn update_profile(
    AuthUser(user_id): AuthUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let display_name = body.display_name.trim();
    if display_name.is_empty() {
        return Err(ApiError::Validation("displayName must not be empty".into()));
    }

    if !db::update_display_name(&state.db, user_id, display_name).await? {
        return Err(ApiError::NotFound("user"));
    }

    let user = db::get_user_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    Ok(Json(user.into()))
}

/// GET /api/profile/stats
///
/// Recomputes the statistics from the recent photo set and persists the
/// fresh figures in the background.
pub async fn stats(
    AuthUser(user_id): AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<UserStats>, ApiError> {
    let stats = state.journal.user_stats(user_id).await?;
    Ok(Json(stats))
}
