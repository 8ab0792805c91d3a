/// Extract the display token from a reverse-geocoded address string.
///
/// Addresses arrive from the client as
/// `"<name> <street>, <city>, <region>, <country>"`, so the second
/// comma-separated segment is taken as the city when at least two segments
/// exist; anything else falls back to the trimmed whole string. This is a
/// positional heuristic over that one format, not place-name extraction.
pub fn display_name(address: &str) -> String {
    let trimmed = address.trim();
    let mut segments = trimmed.split(',');

    match (segments.next(), segments.next()) {
        (Some(_), Some(second)) => second.trim().to_owned(),
        _ => trimmed.to_owned(),
    }
}
