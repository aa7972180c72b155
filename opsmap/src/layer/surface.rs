//! Render surface seam and dataset projections
//!
//! The surface is the one process-wide mutable resource shared by the
//! layer manager and the view controller. All operations are idempotent
//! replace/clear style, so the two callers tolerate being invoked in
//! either order (last applied wins).

use std::sync::Mutex;
use std::time::Duration;

use tracing::{debug, info};

use crate::geo::{GeoBounds, LatLng};
use crate::model::{AttendancePoint, GeofenceArea, HeatmapSample};

/// Circle rendered for one geofence.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleSpec {
    pub id: String,
    pub center: LatLng,
    pub radius_meters: f64,
    pub popup: String,
}

/// Marker style keyed off the attendance direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    CheckIn,
    CheckOut,
}

/// Marker rendered for one attendance point.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub id: String,
    pub coordinate: LatLng,
    pub style: MarkerStyle,
    pub popup: String,
}

/// One weighted point of the density overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    pub coordinate: LatLng,
    pub intensity: f64,
}

/// The shared render surface.
///
/// Layer operations carry replace-all semantics; the heatmap additionally
/// distinguishes create/update/destroy because its renderer holds state
/// that must be fully detached when the layer goes invisible, not merely
/// hidden.
pub trait MapSurface: Send + Sync {
    fn set_geofences(&self, circles: &[CircleSpec]);
    fn clear_geofences(&self);
    fn set_points(&self, markers: &[MarkerSpec]);
    fn clear_points(&self);
    fn create_heatmap(&self, points: &[HeatPoint]);
    fn update_heatmap(&self, points: &[HeatPoint]);
    fn destroy_heatmap(&self);
    fn set_view(&self, center: LatLng, zoom: u8);
    fn fit_bounds(&self, bounds: GeoBounds, padding_px: u32);
    fn fly_to(&self, center: LatLng, zoom: u8, duration: Duration);
}

/// Projects geofences into circles, silently skipping invalid centers.
pub fn project_geofences(areas: &[GeofenceArea]) -> Vec<CircleSpec> {
    areas
        .iter()
        .filter(|area| area.is_renderable())
        .map(|area| CircleSpec {
            id: area.id.clone(),
            center: area.center,
            radius_meters: area.radius_meters,
            popup: match area.campus_label.as_deref() {
                Some(campus) => format!("{} · {}", area.label, campus),
                None => area.label.clone(),
            },
        })
        .collect()
}

/// Projects attendance points into direction-styled markers.
pub fn project_points(points: &[AttendancePoint]) -> Vec<MarkerSpec> {
    points
        .iter()
        .filter(|point| point.is_renderable())
        .map(|point| {
            let place = point
                .building_label
                .as_deref()
                .or(point.address_label.as_deref());
            let mut popup = format!(
                "{} · {} · {}",
                point.user_label,
                point.direction,
                point.timestamp_utc.format("%Y-%m-%d %H:%M")
            );
            if let Some(place) = place {
                popup.push_str(" · ");
                popup.push_str(place);
            }
            MarkerSpec {
                id: point.id.clone(),
                coordinate: point.coordinate,
                style: match point.direction {
                    crate::model::Direction::In => MarkerStyle::CheckIn,
                    crate::model::Direction::Out => MarkerStyle::CheckOut,
                },
                popup,
            }
        })
        .collect()
}

/// Projects heatmap samples into weighted points.
pub fn project_heatmap(samples: &[HeatmapSample]) -> Vec<HeatPoint> {
    samples
        .iter()
        .filter(|sample| sample.is_renderable())
        .map(|sample| HeatPoint {
            coordinate: sample.coordinate,
            intensity: sample.intensity,
        })
        .collect()
}

/// One recorded surface operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    SetGeofences(usize),
    ClearGeofences,
    SetPoints(usize),
    ClearPoints,
    CreateHeatmap(usize),
    UpdateHeatmap(usize),
    DestroyHeatmap,
    SetView { center: LatLng, zoom: u8 },
    FitBounds { bounds: GeoBounds, padding_px: u32 },
    FlyTo { center: LatLng, zoom: u8 },
}

/// Surface double that records every operation for inspection.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Mutex<Vec<SurfaceCall>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: SurfaceCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    /// All recorded operations, in order.
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// The most recent camera operation, if any.
    pub fn last_camera(&self) -> Option<SurfaceCall> {
        self.calls()
            .into_iter()
            .rev()
            .find(|call| {
                matches!(
                    call,
                    SurfaceCall::SetView { .. }
                        | SurfaceCall::FitBounds { .. }
                        | SurfaceCall::FlyTo { .. }
                )
            })
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count_calls(&self, predicate: impl Fn(&SurfaceCall) -> bool) -> usize {
        self.calls().iter().filter(|c| predicate(c)).count()
    }

    pub fn clear(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }
}

impl MapSurface for RecordingSurface {
    fn set_geofences(&self, circles: &[CircleSpec]) {
        self.record(SurfaceCall::SetGeofences(circles.len()));
    }

    fn clear_geofences(&self) {
        self.record(SurfaceCall::ClearGeofences);
    }

    fn set_points(&self, markers: &[MarkerSpec]) {
        self.record(SurfaceCall::SetPoints(markers.len()));
    }

    fn clear_points(&self) {
        self.record(SurfaceCall::ClearPoints);
    }

    fn create_heatmap(&self, points: &[HeatPoint]) {
        self.record(SurfaceCall::CreateHeatmap(points.len()));
    }

    fn update_heatmap(&self, points: &[HeatPoint]) {
        self.record(SurfaceCall::UpdateHeatmap(points.len()));
    }

    fn destroy_heatmap(&self) {
        self.record(SurfaceCall::DestroyHeatmap);
    }

    fn set_view(&self, center: LatLng, zoom: u8) {
        self.record(SurfaceCall::SetView { center, zoom });
    }

    fn fit_bounds(&self, bounds: GeoBounds, padding_px: u32) {
        self.record(SurfaceCall::FitBounds { bounds, padding_px });
    }

    fn fly_to(&self, center: LatLng, zoom: u8, _duration: Duration) {
        self.record(SurfaceCall::FlyTo { center, zoom });
    }
}

/// Surface that logs operations instead of rendering.
///
/// Used by the CLI to make a session observable against a live backend
/// without a map widget.
#[derive(Debug, Default)]
pub struct TracingSurface;

impl TracingSurface {
    pub fn new() -> Self {
        Self
    }
}

impl MapSurface for TracingSurface {
    fn set_geofences(&self, circles: &[CircleSpec]) {
        info!(count = circles.len(), "render geofence circles");
    }

    fn clear_geofences(&self) {
        debug!("clear geofence layer");
    }

    fn set_points(&self, markers: &[MarkerSpec]) {
        info!(count = markers.len(), "render attendance markers");
    }

    fn clear_points(&self) {
        debug!("clear point layer");
    }

    fn create_heatmap(&self, points: &[HeatPoint]) {
        info!(count = points.len(), "create heatmap renderer");
    }

    fn update_heatmap(&self, points: &[HeatPoint]) {
        info!(count = points.len(), "update heatmap point set");
    }

    fn destroy_heatmap(&self) {
        debug!("destroy heatmap renderer");
    }

    fn set_view(&self, center: LatLng, zoom: u8) {
        info!(center = %center, zoom, "set camera view");
    }

    fn fit_bounds(&self, bounds: GeoBounds, padding_px: u32) {
        info!(bounds = %bounds, padding_px, "fit camera to bounds");
    }

    fn fly_to(&self, center: LatLng, zoom: u8, duration: Duration) {
        info!(center = %center, zoom, duration_ms = duration.as_millis() as u64, "fly to target");
    }
}
