use std::collections::HashMap;

use crate::address;
use crate::geo;
use crate::models::{LocationCluster, PhotoRecord, TopLocation, UserStats};

// ── Location clustering ────────────────────────────────────────────────────

struct ClusterBuilder {
    geo_key: String,
    coordinates: crate::models::Coordinates,
    label: Option<String>,
    photos: Vec<PhotoRecord>,
}

impl ClusterBuilder {
    fn push(&mut self, photo: &PhotoRecord) {
        if self.label.is_none() {
            self.label = usable_address(photo.address.as_deref()).map(str::to_owned);
        }
        self.photos.push(photo.clone());
    }

    fn finish(self) -> LocationCluster {
        let label = self
            .label
            .unwrap_or_else(|| format!("{} photos", self.photos.len()));
        LocationCluster {
            geo_key: self.geo_key,
            coordinates: self.coordinates,
            label,
            photos: self.photos,
        }
    }
}

/// Group a user's photos into map-pin clusters by geo-key.
///
/// Records without coordinates are skipped entirely: they get no pin and
/// no synthetic cluster. Clusters come back in first-seen key order, each
/// holding its members in input order, labelled by the first member that
/// carries a non-blank address (or an `"N photos"` fallback when none does).
/// Grouping is by exact rounded-key equality; there is no distance-based
/// merging of neighbouring keys.
pub fn cluster_photos(photos: &[PhotoRecord]) -> Vec<LocationCluster> {
    let mut builders: Vec<ClusterBuilder> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for photo in photos {
        let Some(coordinates) = photo.location else {
            continue;
        };

        let key = geo::geo_key(coordinates);
        match index.get(&key) {
            Some(&slot) => builders[slot].push(photo),
            None => {
                index.insert(key.clone(), builders.len());
                let mut builder = ClusterBuilder {
                    geo_key: key,
                    coordinates,
                    label: None,
                    photos: Vec::new(),
                };
                builder.push(photo);
                builders.push(builder);
            }
        }
    }

    builders.into_iter().map(ClusterBuilder::finish).collect()
}

// ── Statistics ─────────────────────────────────────────────────────────────

struct AddressTally {
    full_address: String,
    display_name: String,
    count: i64,
}

/// Compute the profile statistics for a photo set.
///
/// `total_photos` counts every record. The location figures group by the
/// full trimmed address string, which is a different granularity than the
/// geo-key clustering: two differently formatted addresses for the same
/// spot count as two locations. Records with no usable address are
/// excluded from the location figures but still counted in the total.
/// Ties for the top location go to the address encountered first.
pub fn compute_stats(photos: &[PhotoRecord]) -> UserStats {
    let mut tallies: Vec<AddressTally> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for photo in photos {
        let Some(full_address) = usable_address(photo.address.as_deref()) else {
            continue;
        };

        match index.get(full_address) {
            Some(&slot) => tallies[slot].count += 1,
            None => {
                index.insert(full_address.to_owned(), tallies.len());
                tallies.push(AddressTally {
                    full_address: full_address.to_owned(),
                    display_name: address::display_name(full_address),
                    count: 1,
                });
            }
        }
    }

    // Linear max scan with strict `>`: an earlier entry of equal count
    // keeps the win.
    let mut top: Option<&AddressTally> = None;
    for tally in &tallies {
        if top.map_or(true, |best| tally.count > best.count) {
            top = Some(tally);
        }
    }

    UserStats {
        total_photos: photos.len() as i64,
        locations_visited: tallies.len() as i64,
        top_location: top.map(|tally| TopLocation {
            display_name: tally.display_name.clone(),
            full_address: tally.full_address.clone(),
            count: tally.count,
        }),
    }
}

/// Trim an optional address down to a usable grouping key; whitespace-only
/// strings count as absent.
fn usable_address(address: Option<&str>) -> Option<&str> {
    address.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;
    use chrono::NaiveDate;

    fn photo(id: &str, address: Option<&str>, location: Option<(f64, f64)>) -> PhotoRecord {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        PhotoRecord {
            id: id.to_owned(),
            user_id: 1,
            image_url: format!("https://cdn.example.com/{id}.jpg"),
            date,
            address: address.map(str::to_owned),
            location: location.map(|(latitude, longitude)| Coordinates {
                latitude,
                longitude,
            }),
            created_at: date.and_hms_opt(12, 0, 0).unwrap(),
        }
    }

    // ── Clustering ─────────────────────────────────────────────────────────

    #[test]
    fn photos_without_coordinates_get_no_cluster() {
        let photos = vec![
            photo("a", Some("X, Paris, IDF, France"), None),
            photo("b", None, None),
        ];
        assert!(cluster_photos(&photos).is_empty());
    }

    #[test]
    fn shared_key_photos_land_in_one_cluster() {
        let photos = vec![
            photo("a", None, Some((48.858412, 2.294501))),
            photo("b", None, Some((48.858408, 2.294499))),
        ];

        let clusters = cluster_photos(&photos);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].geo_key, "48.85841,2.29450");
        assert_eq!(clusters[0].photos.len(), 2);
    }

    #[test]
    fn fifth_decimal_difference_splits_clusters() {
        let photos = vec![
            photo("a", None, Some((48.85841, 2.29450))),
            photo("b", None, Some((48.85842, 2.29451))),
        ];
        assert_eq!(cluster_photos(&photos).len(), 2);
    }

    #[test]
    fn clusters_keep_first_seen_order_and_representative() {
        let photos = vec![
            photo("a", None, Some((2.0, 2.000001))),
            photo("b", None, Some((1.0, 1.0))),
            photo("c", None, Some((2.000002, 2.0))),
        ];

        let clusters = cluster_photos(&photos);
        assert_eq!(clusters.len(), 2);
        // First-seen key first, representative = first member's raw fix.
        assert_eq!(clusters[0].geo_key, "2.00000,2.00000");
        assert_eq!(clusters[0].coordinates.latitude, 2.0);
        assert_eq!(clusters[0].coordinates.longitude, 2.000001);
        assert_eq!(clusters[1].geo_key, "1.00000,1.00000");
        let ids: Vec<&str> = clusters[0].photos.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn every_located_photo_lands_in_exactly_one_cluster() {
        let photos = vec![
            photo("a", None, Some((1.0, 1.0))),
            photo("b", Some("X, Paris, IDF, France"), None),
            photo("c", None, Some((2.0, 2.0))),
            photo("d", None, Some((1.0, 1.0))),
            photo("e", None, None),
        ];

        let clusters = cluster_photos(&photos);
        let mut clustered: Vec<&str> = clusters
            .iter()
            .flat_map(|c| c.photos.iter().map(|p| p.id.as_str()))
            .collect();
        clustered.sort_unstable();
        assert_eq!(clustered, ["a", "c", "d"]);
    }

    #[test]
    fn label_comes_from_first_member_with_an_address() {
        let photos = vec![
            photo("a", None, Some((1.0, 1.0))),
            photo("b", Some("A, Paris, IDF, France"), Some((1.0, 1.0))),
            photo("c", Some("B, Paris, IDF, France"), Some((1.0, 1.0))),
        ];

        let clusters = cluster_photos(&photos);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].label, "A, Paris, IDF, France");
    }

    #[test]
    fn label_falls_back_to_member_count() {
        let photos = vec![
            photo("a", None, Some((1.0, 1.0))),
            photo("b", Some("   "), Some((1.0, 1.0))),
        ];

        let clusters = cluster_photos(&photos);
        assert_eq!(clusters[0].label, "2 photos");
    }

    // ── Statistics ─────────────────────────────────────────────────────────

    #[test]
    fn empty_set_yields_zeroed_stats() {
        let stats = compute_stats(&[]);
        assert_eq!(stats, UserStats::zero());
    }

    #[test]
    fn total_counts_every_record_regardless_of_gaps() {
        let photos = vec![
            photo("a", None, None),
            photo("b", Some("X, Paris, IDF, France"), None),
            photo("c", None, Some((1.0, 1.0))),
        ];

        let stats = compute_stats(&photos);
        assert_eq!(stats.total_photos, 3);
        assert_eq!(stats.locations_visited, 1);
    }

    #[test]
    fn trim_equal_addresses_count_as_one_location() {
        let photos = vec![
            photo("a", Some("X, Paris, IDF, France"), None),
            photo("b", Some("  X, Paris, IDF, France  "), None),
        ];

        let stats = compute_stats(&photos);
        assert_eq!(stats.locations_visited, 1);
        assert_eq!(stats.top_location.unwrap().count, 2);
    }

    #[test]
    fn casing_differences_stay_distinct() {
        let photos = vec![
            photo("a", Some("x, paris, IDF, France"), None),
            photo("b", Some("X, Paris, IDF, France"), None),
        ];
        assert_eq!(compute_stats(&photos).locations_visited, 2);
    }

    #[test]
    fn top_location_tie_goes_to_the_first_seen_address() {
        let lyon = Some("X, Lyon, ARA, France");
        let nice = Some("Y, Nice, PACA, France");
        let photos = vec![
            photo("a", lyon, None),
            photo("b", nice, None),
            photo("c", nice, None),
            photo("d", lyon, None),
        ];

        let top = compute_stats(&photos).top_location.unwrap();
        assert_eq!(top.count, 2);
        assert_eq!(top.display_name, "Lyon");

        // Reversed encounter order flips the winner.
        let photos = vec![
            photo("a", nice, None),
            photo("b", lyon, None),
            photo("c", lyon, None),
            photo("d", nice, None),
        ];
        let top = compute_stats(&photos).top_location.unwrap();
        assert_eq!(top.display_name, "Nice");
    }

    #[test]
    fn majority_address_wins() {
        let photos = vec![
            photo("a", Some("X, Lyon, ARA, France"), None),
            photo("b", Some("X, Lyon, ARA, France"), None),
            photo("c", Some("Y, Nice, PACA, France"), None),
        ];

        let stats = compute_stats(&photos);
        assert_eq!(stats.locations_visited, 2);
        let top = stats.top_location.unwrap();
        assert_eq!(top.display_name, "Lyon");
        assert_eq!(top.full_address, "X, Lyon, ARA, France");
        assert_eq!(top.count, 2);
    }

    #[test]
    fn blank_addresses_leave_no_top_location() {
        let photos = vec![
            photo("a", Some("   "), Some((1.0, 1.0))),
            photo("b", None, Some((1.0, 1.0))),
        ];

        let stats = compute_stats(&photos);
        assert_eq!(stats.total_photos, 2);
        assert_eq!(stats.locations_visited, 0);
        assert!(stats.top_location.is_none());
    }

    #[test]
    fn mixed_cluster_and_stats_views_stay_consistent() {
        // One spot, one photo with an address and one without: a single
        // cluster holds both, while the stats see a single location.
        let photos = vec![
            photo("a", None, Some((1.0, 1.0))),
            photo("b", Some("A, Paris, IDF, France"), Some((1.0, 1.0))),
        ];

        let clusters = cluster_photos(&photos);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].photos.len(), 2);
        assert_eq!(clusters[0].label, "A, Paris, IDF, France");

        let stats = compute_stats(&photos);
        assert_eq!(stats.total_photos, 2);
        assert_eq!(stats.locations_visited, 1);
        let top = stats.top_location.unwrap();
        assert_eq!(top.display_name, "Paris");
        assert_eq!(top.full_address, "A, Paris, IDF, France");
        assert_eq!(top.count, 1);
    }
}
