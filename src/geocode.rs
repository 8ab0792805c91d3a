use dashmap::DashMap;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::geo;
use crate::models::Coordinates;

// ── Types ──────────────────────────────────────────────────────────────────

/// Thread-safe in-memory cache: geo-key → Option<address>.
/// `None` means we already tried and the lookup failed/returned no data.
/// Keying by the rounded geo-key lets nearby fixes share one entry.
#[derive(Clone, Debug)]
pub struct AddressCache {
    inner: Arc<DashMap<String, Option<String>>>,
}

impl AddressCache {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }
}

impl Default for AddressCache {
    fn default() -> Self {
        Self::new()
    }
}

// ── Nominatim response shape ───────────────────────────────────────────────

#[derive(Deserialize)]
struct ReverseResponse {
    address: Option<ReverseAddress>,
}

#[derive(Default, Deserialize)]
struct ReverseAddress {
    house_number: Option<String>,
    road: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

// ── Public API ─────────────────────────────────────────────────────────────

/// Reverse-geocode `coordinates` into a journal address, using `cache` to
/// avoid repeated network requests for the same spot.
///
/// Returns `None` for:
/// - coordinates outside the valid WGS84 range
/// - failed or rate-limited service responses
/// - spots that previously returned no useful data
///
/// The lookup is performed with a 3-second timeout so it can never stall a
/// request handler for long.
pub async fn reverse(
    coordinates: Coordinates,
    base_url: &str,
    cache: &AddressCache,
) -> Option<String> {
    // Skip fixes that can never be geocoded
    if !coordinates.in_range() {
        return None;
    }

    let key = geo::geo_key(coordinates);

    // Check cache first (covers both successful hits and known misses)
    if let Some(entry) = cache.inner.get(&key) {
        return entry.clone();
    }

    // Not cached — ask the geocoding service
    let result = fetch_address(coordinates, base_url, &key).await;

    // Store in cache regardless of outcome so we don't retry endlessly
    cache.inner.insert(key, result.clone());

    result
}

// ── Internal helpers ───────────────────────────────────────────────────────

async fn fetch_address(coordinates: Coordinates, base_url: &str, key: &str) -> Option<String> {
    // Build a lightweight client with a strict timeout
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .user_agent(concat!("carnet/", env!("CARGO_PKG_VERSION")))
        .build()
        .ok()?;

    let url = format!(
        "{}/reverse?format=jsonv2&lat={}&lon={}",
        base_url, coordinates.latitude, coordinates.longitude
    );

    let resp = client
        .get(&url)
        .send()
        .await
        .map_err(|e| tracing::debug!("reverse geocode network error for {}: {}", key, e))
        .ok()?;

    let body: ReverseResponse = resp
        .json()
        .await
        .map_err(|e| tracing::debug!("reverse geocode parse error for {}: {}", key, e))
        .ok()?;

    let Some(address) = body.address else {
        tracing::debug!("reverse geocode returned no address for {}", key);
        return None;
    };

    format_address(address)
}

/// Assemble the journal address string: `"{name} {street}, {city}, {region},
/// {country}"`, with missing parts left blank. The city slot falls back to
/// town, then village.
fn format_address(address: ReverseAddress) -> Option<String> {
    let name = address
        .house_number
        .filter(|s| !s.is_empty())
        .unwrap_or_default();
    let street = address.road.filter(|s| !s.is_empty()).unwrap_or_default();
    let city = address
        .city
        .filter(|s| !s.is_empty())
        .or_else(|| address.town.filter(|s| !s.is_empty()))
        .or_else(|| address.village.filter(|s| !s.is_empty()))
        .unwrap_or_default();
    let region = address.state.filter(|s| !s.is_empty()).unwrap_or_default();
    let country = address.country.filter(|s| !s.is_empty()).unwrap_or_default();

    // Treat completely empty results as a miss
    if name.is_empty() && street.is_empty() && city.is_empty() && region.is_empty() && country.is_empty()
    {
        return None;
    }

    Some(format!("{} {}, {}, {}, {}", name, street, city, region, country))
}
