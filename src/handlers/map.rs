use crate::{auth::AuthUser, error::ApiError, models::LocationCluster, AppState};
use axum::{extract::State, Json};
use std::sync::Arc;

/// GET /api/map/pins
///
/// One pin per distinct geo-key over the user's recent photos.
pub async fn pins(
    AuthUser(user_id): AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LocationCluster>>, ApiError> {
    let clusters = state.journal.map_pins(user_id).await?;
    Ok(Json(clusters))
}
