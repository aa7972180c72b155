//! Coordinate and bounding-box type definitions

use std::fmt;

use serde::Deserialize;

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LNG: f64 = -180.0;
pub const MAX_LNG: f64 = 180.0;

fn nan() -> f64 {
    f64::NAN
}

/// A WGS84 coordinate pair.
///
/// Backend payloads occasionally omit or corrupt a coordinate. Missing
/// fields decode as NaN so one malformed entity never fails an entire
/// payload; consumers must check [`LatLng::is_finite`] before rendering
/// or folding into bounds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LatLng {
    /// Latitude in decimal degrees, NaN when absent.
    #[serde(default = "nan")]
    pub lat: f64,
    /// Longitude in decimal degrees, NaN when absent.
    #[serde(default = "nan", alias = "lon")]
    pub lng: f64,
}

impl LatLng {
    /// Creates a coordinate pair from decimal degrees.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both components are finite and therefore renderable.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl Default for LatLng {
    /// The "absent" coordinate: both components NaN.
    fn default() -> Self {
        Self::new(f64::NAN, f64::NAN)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Axis-aligned geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl GeoBounds {
    /// Creates a degenerate box containing a single point.
    pub fn from_point(lat: f64, lng: f64) -> Self {
        Self {
            min_lat: lat,
            max_lat: lat,
            min_lng: lng,
            max_lng: lng,
        }
    }

    /// Expands the box to include the given point.
    pub fn expand(&mut self, lat: f64, lng: f64) {
        self.min_lat = self.min_lat.min(lat);
        self.max_lat = self.max_lat.max(lat);
        self.min_lng = self.min_lng.min(lng);
        self.max_lng = self.max_lng.max(lng);
    }

    /// Folds finite points into the minimal enclosing box.
    ///
    /// Non-finite coordinates are skipped. Returns `None` when no finite
    /// point was seen.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut bounds: Option<Self> = None;
        for point in points {
            if !point.is_finite() {
                continue;
            }
            match bounds.as_mut() {
                Some(b) => b.expand(point.lat, point.lng),
                None => bounds = Some(Self::from_point(point.lat, point.lng)),
            }
        }
        bounds
    }

    /// Whether the box contains the given point (inclusive edges).
    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lng >= self.min_lng
            && point.lng <= self.max_lng
    }

    /// Geometric center of the box.
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}

impl fmt::Display for GeoBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.6}, {:.6}] x [{:.6}, {:.6}]",
            self.min_lat, self.max_lat, self.min_lng, self.max_lng
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latlng_finite() {
        assert!(LatLng::new(-6.2, 106.8).is_finite());
        assert!(!LatLng::new(f64::NAN, 106.8).is_finite());
        assert!(!LatLng::new(-6.2, f64::INFINITY).is_finite());
        assert!(!LatLng::default().is_finite());
    }

    #[test]
    fn test_latlng_deserialize_missing_component() {
        let point: LatLng = serde_json::from_str(r#"{"lat": -6.2}"#).unwrap();
        assert_eq!(point.lat, -6.2);
        assert!(point.lng.is_nan());
        assert!(!point.is_finite());
    }

    #[test]
    fn test_latlng_deserialize_lon_alias() {
        let point: LatLng = serde_json::from_str(r#"{"lat": 1.0, "lon": 2.0}"#).unwrap();
        assert_eq!(point.lng, 2.0);
    }

    #[test]
    fn test_bounds_from_point_is_degenerate() {
        let bounds = GeoBounds::from_point(-6.2, 106.8);
        assert_eq!(bounds.min_lat, bounds.max_lat);
        assert_eq!(bounds.min_lng, bounds.max_lng);
        assert!(bounds.contains(LatLng::new(-6.2, 106.8)));
    }

    #[test]
    fn test_bounds_expand() {
        let mut bounds = GeoBounds::from_point(-6.20, 106.80);
        bounds.expand(-6.22, 106.90);
        assert!(bounds.contains(LatLng::new(-6.20, 106.80)));
        assert!(bounds.contains(LatLng::new(-6.22, 106.90)));
        assert!(bounds.contains(LatLng::new(-6.21, 106.85)));
        assert!(!bounds.contains(LatLng::new(-6.30, 106.85)));
    }

    #[test]
    fn test_bounds_from_points_skips_non_finite() {
        let bounds = GeoBounds::from_points(vec![
            LatLng::new(f64::NAN, 10.0),
            LatLng::new(1.0, 2.0),
            LatLng::new(3.0, 4.0),
        ])
        .unwrap();
        assert_eq!(bounds.min_lat, 1.0);
        assert_eq!(bounds.max_lat, 3.0);
        assert_eq!(bounds.min_lng, 2.0);
        assert_eq!(bounds.max_lng, 4.0);
    }

    #[test]
    fn test_bounds_from_points_empty_or_all_invalid() {
        assert!(GeoBounds::from_points(Vec::new()).is_none());
        assert!(GeoBounds::from_points(vec![LatLng::default()]).is_none());
    }

    #[test]
    fn test_bounds_center() {
        let mut bounds = GeoBounds::from_point(0.0, 0.0);
        bounds.expand(2.0, 4.0);
        assert_eq!(bounds.center(), LatLng::new(1.0, 2.0));
    }
}
