use crate::models::Coordinates;

/// Number of decimal places a coordinate keeps when it becomes part of a
/// geo-key. Five decimals is roughly one metre at the equator, tight enough
/// that repeated shots from the same spot collapse into one pin.
pub const GEO_KEY_PRECISION: usize = 5;

/// Produce the grouping key for a coordinate pair: each component rounded
/// to [`GEO_KEY_PRECISION`] decimals, joined with a comma.
///
/// Two pairs share a key exactly when their rounded representations are
/// equal. Points that straddle a rounding boundary get different keys even
/// when they are under a metre apart; callers must not expect any
/// distance-based merging on top of this.
pub fn geo_key(coordinates: Coordinates) -> String {
    format!(
        "{:.prec$},{:.prec$}",
        coordinates.latitude,
        coordinates.longitude,
        prec = GEO_KEY_PRECISION
    )
}
