//! Search matching and selection

use std::collections::HashSet;

use crate::model::{AttendancePoint, FlyTarget, GeofenceArea, ResultKind, SearchResult};

/// Maximum entries in the combined result list.
pub const DEFAULT_LIMIT: usize = 10;

/// Zoom applied when flying to a selected result, regardless of kind.
pub const SELECT_ZOOM: u8 = 18;

/// Builds the result list for a query, pure in `(query, geofences, points)`.
///
/// Matching is case-insensitive substring match against the geofence label
/// and its campus label, and against the attendance point's user label.
/// Geofence matches come first, then member matches, truncated to `limit`;
/// there is no further ranking. Members are deduplicated by user label
/// before matching, first occurrence in dataset order winning (upstream
/// ordering is not guaranteed chronological, so "latest" would be
/// arbitrary anyway). Entities without a finite coordinate are skipped:
/// every result doubles as a fly-to target.
pub fn search(
    query: &str,
    geofences: &[GeofenceArea],
    points: &[AttendancePoint],
    limit: usize,
) -> Vec<SearchResult> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut results = Vec::new();

    for area in geofences {
        if results.len() >= limit {
            return results;
        }
        if !area.is_renderable() {
            continue;
        }
        let campus = area.campus_label.as_deref().unwrap_or("");
        if area.label.to_lowercase().contains(&needle)
            || campus.to_lowercase().contains(&needle)
        {
            results.push(SearchResult {
                kind: ResultKind::Geofence,
                label: area.label.clone(),
                sublabel: campus.to_string(),
                coordinate: area.center,
                source_id: area.id.clone(),
            });
        }
    }

    let mut seen_users = HashSet::new();
    for point in points {
        if results.len() >= limit {
            return results;
        }
        if !point.is_renderable() {
            continue;
        }
        // Dedup before matching: one result per user label, first usable
        // occurrence in dataset order.
        if !seen_users.insert(point.user_label.clone()) {
            continue;
        }
        if point.user_label.to_lowercase().contains(&needle) {
            results.push(SearchResult {
                kind: ResultKind::Member,
                label: point.user_label.clone(),
                sublabel: point
                    .building_label
                    .clone()
                    .or_else(|| point.address_label.clone())
                    .unwrap_or_else(|| point.timestamp_utc.format("%Y-%m-%d %H:%M").to_string()),
                coordinate: point.coordinate,
                source_id: point.id.clone(),
            });
        }
    }

    results
}

/// Turns a selected result into the ephemeral fly-to signal.
///
/// The zoom is fixed regardless of the result's kind; clearing the results
/// panel and echoing the label into the search box is the caller's job.
pub fn select(result: &SearchResult) -> FlyTarget {
    FlyTarget {
        coordinate: result.coordinate,
        zoom: SELECT_ZOOM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LatLng;
    use crate::model::Direction;
    use chrono::{TimeZone, Utc};

    fn area(id: &str, label: &str, campus: Option<&str>) -> GeofenceArea {
        GeofenceArea {
            id: id.to_string(),
            label: label.to_string(),
            campus_id: campus.map(|_| "c1".to_string()),
            campus_label: campus.map(str::to_string),
            center: LatLng::new(-6.2, 106.8),
            radius_meters: 100.0,
        }
    }

    fn point(id: &str, user: &str, lat: f64, lng: f64) -> AttendancePoint {
        AttendancePoint {
            id: id.to_string(),
            user_label: user.to_string(),
            direction: Direction::In,
            coordinate: LatLng::new(lat, lng),
            timestamp_utc: Utc.with_ymd_and_hms(2026, 8, 20, 8, 0, 0).unwrap(),
            building_label: None,
            address_label: None,
        }
    }

    #[test]
    fn test_empty_or_whitespace_query_yields_nothing() {
        let geofences = vec![area("1", "Library", None)];
        let points = vec![point("a", "Dewi", -6.2, 106.8)];
        assert!(search("", &geofences, &points, DEFAULT_LIMIT).is_empty());
        assert!(search("   ", &geofences, &points, DEFAULT_LIMIT).is_empty());
    }

    #[test]
    fn test_case_insensitive_label_match() {
        let geofences = vec![area("1", "Main Library", None)];
        let results = search("lIbRaRy", &geofences, &[], DEFAULT_LIMIT);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, ResultKind::Geofence);
        assert_eq!(results[0].source_id, "1");
    }

    #[test]
    fn test_campus_label_matches_too() {
        let geofences = vec![area("1", "Block A", Some("North Campus"))];
        let results = search("north", &geofences, &[], DEFAULT_LIMIT);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].sublabel, "North Campus");
    }

    #[test]
    fn test_members_deduplicated_first_occurrence_wins() {
        let points = vec![
            point("a", "Dewi", -6.20, 106.80),
            point("b", "Dewi", -6.25, 106.85),
            point("c", "Budi", -6.30, 106.90),
        ];
        let results = search("dewi", &[], &points, DEFAULT_LIMIT);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source_id, "a");
        assert_eq!(results[0].coordinate, LatLng::new(-6.20, 106.80));
    }

    #[test]
    fn test_no_two_member_results_share_user_label() {
        let points: Vec<_> = (0..5)
            .map(|i| point(&format!("p{i}"), "Dewi", -6.2, 106.8))
            .collect();
        let results = search("dew", &[], &points, DEFAULT_LIMIT);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_geofences_come_before_members_and_list_truncates() {
        let geofences: Vec<_> = (0..8)
            .map(|i| area(&format!("g{i}"), &format!("Hall {i}"), None))
            .collect();
        let points: Vec<_> = (0..8)
            .map(|i| point(&format!("p{i}"), &format!("Hall Monitor {i}"), -6.2, 106.8))
            .collect();
        let results = search("hall", &geofences, &points, DEFAULT_LIMIT);
        assert_eq!(results.len(), DEFAULT_LIMIT);
        assert!(results[..8]
            .iter()
            .all(|r| r.kind == ResultKind::Geofence));
        assert!(results[8..].iter().all(|r| r.kind == ResultKind::Member));
    }

    #[test]
    fn test_non_renderable_entities_are_skipped() {
        let mut invalid = area("1", "Library", None);
        invalid.center = LatLng::default();
        let results = search("library", &[invalid], &[], DEFAULT_LIMIT);
        assert!(results.is_empty());

        let ghost = point("a", "Dewi", f64::NAN, 106.8);
        assert!(search("dewi", &[], &[ghost], DEFAULT_LIMIT).is_empty());
    }

    #[test]
    fn test_select_uses_fixed_zoom_for_both_kinds() {
        let geofences = vec![area("1", "Library", None)];
        let points = vec![point("a", "Dewi", -6.3, 106.9)];
        let geofence_hit = &search("library", &geofences, &[], DEFAULT_LIMIT)[0];
        let member_hit = &search("dewi", &[], &points, DEFAULT_LIMIT)[0];

        let target = select(geofence_hit);
        assert_eq!(target.zoom, SELECT_ZOOM);
        assert_eq!(target.coordinate, geofence_hit.coordinate);
        assert_eq!(select(member_hit).zoom, SELECT_ZOOM);
    }

    #[test]
    fn test_every_geofence_result_matches_query() {
        let geofences = vec![
            area("1", "Library", Some("North Campus")),
            area("2", "Gym", Some("South Campus")),
        ];
        for result in search("campus", &geofences, &[], DEFAULT_LIMIT) {
            let q = "campus";
            assert!(
                result.label.to_lowercase().contains(q)
                    || result.sublabel.to_lowercase().contains(q)
            );
        }
    }
}
