use crate::{auth::AuthUser, error::ApiError, geocode, models::Coordinates, AppState};
use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /api/geocode?latitude=..&longitude=..
///
/// Resolves a coordinate pair to a journal address. A lookup miss is not an
/// error: the body carries `"address": null` and the client keeps the photo
/// without one.
pub async fn reverse(
    _auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(coordinates): Query<Coordinates>,
) -> Result<Json<Value>, ApiError> {
    if !coordinates.in_range() {
        return Err(ApiError::Validation(
            "coordinates are outside the valid range".into(),
        ));
    }

    let address = geocode::reverse(coordinates, &state.config.geocoder_url, &state.geo_cache).await;

    Ok(Json(json!({ "address": address })))
}
