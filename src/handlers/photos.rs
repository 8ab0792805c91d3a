use crate::{
    auth::AuthUser,
    db,
    error::ApiError,
    models::{Coordinates, PhotoRecord},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ── Request / response types ───────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePhotoRequest {
    image_url: String,
    date: NaiveDate,
    address: Option<String>,
    location: Option<Coordinates>,
}

#[derive(Deserialize)]
pub struct PhotoFilter {
    date: Option<NaiveDate>,
    location: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    date: NaiveDate,
    photo_count: i64,
}

// ── Handlers ───────────────────────────────────────────────────────────────

/// POST /api/photos
pub async fn create_photo(
    AuthUser(user_id): AuthUser,
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreatePhotoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let image_url = body.image_url.trim().to_owned();
    if image_url.is_empty() {
        return Err(ApiError::Validation("imageUrl must not be empty".into()));
    }
    if !image_url.starts_with("http://") && !image_url.starts_with("https://") {
        return Err(ApiError::Validation(
            "imageUrl must start with http:// or https://".into(),
        ));
    }

    if let Some(location) = body.location {
        if !location.in_range() {
            return Err(ApiError::Validation(
                "location is outside the valid coordinate range".into(),
            ));
        }
    }

    // Blank addresses are stored as absent.
    let address = body
        .address
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let photo = db::insert_photo(
        &state.db,
        user_id,
        &image_url,
        body.date,
        address,
        body.location,
    )
    .await?;

    // Refresh the persisted statistics off the request path.
    state.journal.refresh_stats(user_id);

    Ok((StatusCode::CREATED, Json(photo)))
}

/// GET /api/photos?date=2024-05-01&location=...
///
/// Both filters are optional; `location` is a case-insensitive substring
/// match against the stored address, and photos without one never match.
pub async fn list_photos(
    AuthUser(user_id): AuthUser,
    State(state): State<Arc<AppState>>,
    Query(filter): Query<PhotoFilter>,
) -> Result<Json<Vec<PhotoRecord>>, ApiError> {
    let photos = db::photos_for_user(
        &state.db,
        user_id,
        filter.date,
        filter.location.as_deref(),
        state.config.photo_fetch_limit,
    )
    .await?;

    Ok(Json(photos))
}

/// GET /api/photos/calendar
///
/// Per-date photo counts across the whole journal, newest date first.
pub async fn calendar(
    AuthUser(user_id): AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CalendarDay>>, ApiError> {
    let days = db::photo_dates(&state.db, user_id)
        .await?
        .into_iter()
        .map(|(date, photo_count)| CalendarDay { date, photo_count })
        .collect();

    Ok(Json(days))
}

/// DELETE /api/photos/:id
pub async fn delete_photo(
    AuthUser(user_id): AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !db::delete_photo(&state.db, &id, user_id).await? {
        return Err(ApiError::NotFound("photo"));
    }

    state.journal.refresh_stats(user_id);

    Ok(StatusCode::NO_CONTENT)
}
