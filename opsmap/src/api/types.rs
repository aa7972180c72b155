//! API trait, query and error types

use std::future::Future;

use thiserror::Error;

use crate::model::{AttendancePoint, Campus, DateRange, GeofenceArea, HeatmapSample};

/// Errors that can occur calling the backend.
///
/// Cloneable so a single error can be both recorded per-dataset and
/// carried in a broadcast notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Transport-level failure (DNS, connect, TLS, body read).
    #[error("transport error: {0}")]
    Transport(String),

    /// Endpoint answered with a non-2xx status.
    #[error("unexpected status {status} from {endpoint}")]
    Status { endpoint: &'static str, status: u16 },

    /// Body was not valid JSON for the expected shape.
    #[error("failed to decode {endpoint} response: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },
}

/// Query for the geofence list: campus filter only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GeofenceQuery {
    pub campus_id: Option<String>,
}

impl GeofenceQuery {
    /// Encodes the query as URL pairs, omitting absent fields.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(campus_id) = &self.campus_id {
            pairs.push(("campusId", campus_id.clone()));
        }
        pairs
    }
}

/// Query for attendance points: campus plus calendar-date range.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PointQuery {
    pub campus_id: Option<String>,
    pub range: DateRange,
}

impl PointQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        campus_and_range_pairs(self.campus_id.as_deref(), self.range)
    }
}

/// Query for heatmap samples: campus plus calendar-date range.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeatmapQuery {
    pub campus_id: Option<String>,
    pub range: DateRange,
}

impl HeatmapQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        campus_and_range_pairs(self.campus_id.as_deref(), self.range)
    }
}

/// Dates travel as plain calendar dates, no time-of-day.
fn campus_and_range_pairs(
    campus_id: Option<&str>,
    range: DateRange,
) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if let Some(campus_id) = campus_id {
        pairs.push(("campusId", campus_id.to_string()));
    }
    if let Some(start) = range.start {
        pairs.push(("startDate", start.format("%Y-%m-%d").to_string()));
    }
    if let Some(end) = range.end {
        pairs.push(("endDate", end.format("%Y-%m-%d").to_string()));
    }
    pairs
}

/// Trait for the facility-operations REST backend.
///
/// Uses non-blocking I/O via async/await. Each method corresponds to one
/// endpoint and fails independently of the others.
pub trait MapApi: Send + Sync {
    /// Fetches the campus options for the filter bar.
    fn campus_options(&self) -> impl Future<Output = Result<Vec<Campus>, ApiError>> + Send;

    /// Fetches building geofences, optionally filtered by campus.
    fn geofences(
        &self,
        query: &GeofenceQuery,
    ) -> impl Future<Output = Result<Vec<GeofenceArea>, ApiError>> + Send;

    /// Fetches attendance points for the campus and date range.
    fn attendance_points(
        &self,
        query: &PointQuery,
    ) -> impl Future<Output = Result<Vec<AttendancePoint>, ApiError>> + Send;

    /// Fetches heatmap density samples for the campus and date range.
    fn heatmap_samples(
        &self,
        query: &HeatmapQuery,
    ) -> impl Future<Output = Result<Vec<HeatmapSample>, ApiError>> + Send;
}
