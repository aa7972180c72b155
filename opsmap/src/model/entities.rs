//! Dataset entity definitions
//!
//! These mirror the REST payload shapes. Decoding is deliberately tolerant:
//! absent coordinates become NaN (excluded downstream), an absent radius
//! falls back to [`DEFAULT_RADIUS_M`], and an absent or non-positive
//! intensity falls back to 1.0. One malformed entity never fails a payload.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::geo::LatLng;

/// Geofence radius used when the backend omits one, in meters.
pub const DEFAULT_RADIUS_M: f64 = 100.0;

fn default_radius() -> f64 {
    DEFAULT_RADIUS_M
}

fn default_intensity() -> f64 {
    1.0
}

/// Accepts a missing, null or non-positive intensity as 1.0.
fn de_intensity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(match raw {
        Some(value) if value.is_finite() && value > 0.0 => value,
        _ => 1.0,
    })
}

/// A campus option for the filter bar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Campus {
    pub id: String,
    pub label: String,
}

/// A circular building geofence.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeofenceArea {
    pub id: String,
    pub label: String,
    /// Owning campus, when the building is assigned to one.
    #[serde(default)]
    pub campus_id: Option<String>,
    #[serde(default)]
    pub campus_label: Option<String>,
    #[serde(default)]
    pub center: LatLng,
    #[serde(default = "default_radius")]
    pub radius_meters: f64,
}

impl GeofenceArea {
    /// Whether the geofence has a finite center and can be rendered or
    /// folded into bounds.
    #[inline]
    pub fn is_renderable(&self) -> bool {
        self.center.is_finite()
    }
}

/// Direction of an attendance event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    In,
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => write!(f, "IN"),
            Self::Out => write!(f, "OUT"),
        }
    }
}

/// A single attendance event with its capture location.
///
/// Immutable once fetched; the whole slice is replaced on the next fetch
/// cycle, never patched in place.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendancePoint {
    pub id: String,
    pub user_label: String,
    pub direction: Direction,
    #[serde(default)]
    pub coordinate: LatLng,
    pub timestamp_utc: DateTime<Utc>,
    #[serde(default)]
    pub building_label: Option<String>,
    #[serde(default)]
    pub address_label: Option<String>,
}

impl AttendancePoint {
    #[inline]
    pub fn is_renderable(&self) -> bool {
        self.coordinate.is_finite()
    }
}

/// A weighted point contributing to the density overlay.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HeatmapSample {
    #[serde(default)]
    pub coordinate: LatLng,
    /// Positive weight, sanitized to 1.0 when absent or invalid.
    #[serde(default = "default_intensity", deserialize_with = "de_intensity")]
    pub intensity: f64,
}

impl HeatmapSample {
    #[inline]
    pub fn is_renderable(&self) -> bool {
        self.coordinate.is_finite()
    }
}
