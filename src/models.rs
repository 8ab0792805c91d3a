use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A GPS fix in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// `true` when both components are inside the valid WGS84 range.
    pub fn in_range(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= 90.0
            && self.longitude.abs() <= 180.0
    }
}

/// One captured photo entry from the `photos` table.
///
/// Immutable once written: the only supported mutation is a hard delete.
/// `address` and `location` are independently optional: reverse geocoding
/// or the location permission may have failed on the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    pub id: String,
    pub user_id: i64,
    pub image_url: String,
    pub date: NaiveDate,
    pub address: Option<String>,
    pub location: Option<Coordinates>,
    pub created_at: NaiveDateTime,
}

/// A map-pin grouping of photos taken at effectively the same spot
/// (equal 5-decimal geo-keys). Derived, never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationCluster {
    /// Rounded-coordinate key, e.g. `"48.85841,2.29450"`.
    pub geo_key: String,
    /// Raw coordinates of the first photo assigned to this key.
    pub coordinates: Coordinates,
    /// Address of the first member that has one, else an `"N photos"` fallback.
    pub label: String,
    /// Members in input order.
    pub photos: Vec<PhotoRecord>,
}

/// The single most-photographed address for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopLocation {
    pub display_name: String,
    pub full_address: String,
    pub count: i64,
}

/// Summary statistics shown on the profile screen. Derived from the photo
/// set on demand and cached on the `users` row best-effort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_photos: i64,
    pub locations_visited: i64,
    pub top_location: Option<TopLocation>,
}

impl UserStats {
    pub fn zero() -> Self {
        Self {
            total_photos: 0,
            locations_visited: 0,
            top_location: None,
        }
    }
}

/// A user account row, including the cached stats columns.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub created_at: NaiveDateTime,
    pub total_photos: i64,
    pub locations_visited: i64,
    pub top_location_name: Option<String>,
    pub top_location_address: Option<String>,
    pub top_location_count: Option<i64>,
    pub stats_updated_at: Option<NaiveDateTime>,
}

impl User {
    /// Assemble the cached stats columns back into a `UserStats` view.
    /// The three top-location columns are written together; a row missing
    /// any of them has no top location.
    pub fn cached_stats(&self) -> UserStats {
        let top_location = match (
            &self.top_location_name,
            &self.top_location_address,
            self.top_location_count,
        ) {
            (Some(name), Some(address), Some(count)) => Some(TopLocation {
                display_name: name.clone(),
                full_address: address.clone(),
                count,
            }),
            _ => None,
        };

        UserStats {
            total_photos: self.total_photos,
            locations_visited: self.locations_visited,
            top_location,
        }
    }
}

/// Profile payload sent to the client. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub display_name: String,
    pub created_at: NaiveDateTime,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            created_at: user.created_at,
        }
    }
}
