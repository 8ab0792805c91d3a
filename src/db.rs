use chrono::{NaiveDate, NaiveDateTime};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{Coordinates, PhotoRecord, User, UserStats};

// ── Users ──────────────────────────────────────────────────────────────────

/// Insert a new user and return the newly created row.
pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
    display_name: &str,
) -> Result<User, sqlx::Error> {
    let id = sqlx::query("INSERT INTO users (email, password_hash, display_name) VALUES (?1, ?2, ?3)")
        .bind(email)
        .bind(password_hash)
        .bind(display_name)
        .execute(pool)
        .await?
        .last_insert_rowid();

    let user: User = sqlx::query_as(
        "SELECT id, email, password_hash, display_name, created_at,
                total_photos, locations_visited,
                top_location_name, top_location_address, top_location_count,
                stats_updated_at
         FROM users WHERE id = ?1",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    let user: Option<User> = sqlx::query_as(
        "SELECT id, email, password_hash, display_name, created_at,
                total_photos, locations_visited,
                top_location_name, top_location_address, top_location_count,
                stats_updated_at
         FROM users WHERE email = ?1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    let user: Option<User> = sqlx::query_as(
        "SELECT id, email, password_hash, display_name, created_at,
                total_photos, locations_visited,
                top_location_name, top_location_address, top_location_count,
                stats_updated_at
         FROM users WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn update_display_name(
    pool: &SqlitePool,
    user_id: i64,
    display_name: &str,
) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query("UPDATE users SET display_name = ?2 WHERE id = ?1")
        .bind(user_id)
        .bind(display_name)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(affected > 0)
}

// ── Profile statistics ─────────────────────────────────────────────────────

/// Persist freshly computed statistics onto the user row. Designed to be
/// called from a spawned background task so that the HTTP response is never
/// blocked by the write.
pub async fn write_user_stats(
    pool: &SqlitePool,
    user_id: i64,
    stats: &UserStats,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users
         SET total_photos = ?2,
             locations_visited = ?3,
             top_location_name = ?4,
             top_location_address = ?5,
             top_location_count = ?6,
             stats_updated_at = CURRENT_TIMESTAMP
         WHERE id = ?1",
    )
    .bind(user_id)
    .bind(stats.total_photos)
    .bind(stats.locations_visited)
    .bind(stats.top_location.as_ref().map(|top| top.display_name.as_str()))
    .bind(stats.top_location.as_ref().map(|top| top.full_address.as_str()))
    .bind(stats.top_location.as_ref().map(|top| top.count))
    .execute(pool)
    .await?;

    Ok(())
}

// ── Photos ─────────────────────────────────────────────────────────────────

#[derive(sqlx::FromRow)]
struct PhotoRow {
    id: String,
    user_id: i64,
    image_url: String,
    date: NaiveDate,
    address: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    created_at: NaiveDateTime,
}

impl PhotoRow {
    fn into_record(self) -> PhotoRecord {
        // The schema CHECK keeps latitude and longitude null together.
        let location = self
            .latitude
            .zip(self.longitude)
            .map(|(latitude, longitude)| Coordinates {
                latitude,
                longitude,
            });

        PhotoRecord {
            id: self.id,
            user_id: self.user_id,
            image_url: self.image_url,
            date: self.date,
            address: self.address,
            location,
            created_at: self.created_at,
        }
    }
}

/// Insert a new photo and return the newly created row.
pub async fn insert_photo(
    pool: &SqlitePool,
    user_id: i64,
    image_url: &str,
    date: NaiveDate,
    address: Option<&str>,
    location: Option<Coordinates>,
) -> Result<PhotoRecord, sqlx::Error> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        "INSERT INTO photos (id, user_id, image_url, date, address, latitude, longitude)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(&id)
    .bind(user_id)
    .bind(image_url)
    .bind(date)
    .bind(address)
    .bind(location.map(|c| c.latitude))
    .bind(location.map(|c| c.longitude))
    .execute(pool)
    .await?;

    let row: PhotoRow = sqlx::query_as(
        "SELECT id, user_id, image_url, date, address, latitude, longitude, created_at
         FROM photos WHERE id = ?1",
    )
    .bind(&id)
    .fetch_one(pool)
    .await?;

    Ok(row.into_record())
}

/// Fetch a user's photos, newest first, optionally narrowed to a single
/// journal date or an address fragment (case-insensitive substring, so the
/// gallery search box matches "lyon" against "X, Lyon, ARA, France").
pub async fn photos_for_user(
    pool: &SqlitePool,
    user_id: i64,
    date: Option<NaiveDate>,
    location: Option<&str>,
    limit: u32,
) -> Result<Vec<PhotoRecord>, sqlx::Error> {
    let rows: Vec<PhotoRow> = sqlx::query_as(
        "SELECT id, user_id, image_url, date, address, latitude, longitude, created_at
         FROM photos
         WHERE user_id = ?1
           AND (?2 IS NULL OR date = ?2)
           AND (?3 IS NULL OR address LIKE '%' || ?3 || '%')
         ORDER BY date DESC, created_at DESC, id
         LIMIT ?4",
    )
    .bind(user_id)
    .bind(date)
    .bind(location)
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(PhotoRow::into_record).collect())
}

/// Permanently delete one of the user's photos. Returns `false` when the id
/// does not exist or belongs to someone else.
pub async fn delete_photo(pool: &SqlitePool, id: &str, user_id: i64) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query("DELETE FROM photos WHERE id = ?1 AND user_id = ?2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(affected > 0)
}

/// Per-date photo counts across the user's whole journal, newest date first.
pub async fn photo_dates(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<(NaiveDate, i64)>, sqlx::Error> {
    let rows: Vec<(NaiveDate, i64)> = sqlx::query_as(
        "SELECT date, COUNT(*) as photo_count
         FROM photos
         WHERE user_id = ?1
         GROUP BY date
         ORDER BY date DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
