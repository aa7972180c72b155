//! Scriptable in-memory backend
//!
//! [`ScriptedMapApi`] answers each endpoint from a queue of scripted
//! responses with optional delays, falling back to an empty payload when
//! the queue runs dry. It records received queries and counts calls, which
//! is what the race and no-refetch tests need. Also usable as an offline
//! demo backend.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::types::{ApiError, GeofenceQuery, HeatmapQuery, MapApi, PointQuery};
use crate::model::{AttendancePoint, Campus, GeofenceArea, HeatmapSample};

type Script<T> = VecDeque<(Duration, Result<Vec<T>, ApiError>)>;

/// In-memory [`MapApi`] with scriptable per-call responses.
#[derive(Default)]
pub struct ScriptedMapApi {
    campuses: Mutex<Vec<Campus>>,
    geofences: Mutex<Script<GeofenceArea>>,
    points: Mutex<Script<AttendancePoint>>,
    heatmap: Mutex<Script<HeatmapSample>>,
    geofence_queries: Mutex<Vec<GeofenceQuery>>,
    point_queries: Mutex<Vec<PointQuery>>,
    heatmap_queries: Mutex<Vec<HeatmapQuery>>,
    geofence_calls: AtomicUsize,
    point_calls: AtomicUsize,
    heatmap_calls: AtomicUsize,
}

impl ScriptedMapApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fixed campus-options payload.
    pub fn set_campuses(&self, campuses: Vec<Campus>) {
        if let Ok(mut slot) = self.campuses.lock() {
            *slot = campuses;
        }
    }

    /// Queues the next geofence response, answered after `delay`.
    pub fn push_geofences(&self, delay: Duration, result: Result<Vec<GeofenceArea>, ApiError>) {
        if let Ok(mut script) = self.geofences.lock() {
            script.push_back((delay, result));
        }
    }

    /// Queues the next attendance-point response.
    pub fn push_points(&self, delay: Duration, result: Result<Vec<AttendancePoint>, ApiError>) {
        if let Ok(mut script) = self.points.lock() {
            script.push_back((delay, result));
        }
    }

    /// Queues the next heatmap response.
    pub fn push_heatmap(&self, delay: Duration, result: Result<Vec<HeatmapSample>, ApiError>) {
        if let Ok(mut script) = self.heatmap.lock() {
            script.push_back((delay, result));
        }
    }

    pub fn geofence_calls(&self) -> usize {
        self.geofence_calls.load(Ordering::Relaxed)
    }

    pub fn point_calls(&self) -> usize {
        self.point_calls.load(Ordering::Relaxed)
    }

    pub fn heatmap_calls(&self) -> usize {
        self.heatmap_calls.load(Ordering::Relaxed)
    }

    /// Total endpoint calls across the three datasets.
    pub fn total_calls(&self) -> usize {
        self.geofence_calls() + self.point_calls() + self.heatmap_calls()
    }

    /// Queries received by the geofence endpoint, in call order.
    pub fn recorded_geofence_queries(&self) -> Vec<GeofenceQuery> {
        self.geofence_queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    pub fn recorded_point_queries(&self) -> Vec<PointQuery> {
        self.point_queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    pub fn recorded_heatmap_queries(&self) -> Vec<HeatmapQuery> {
        self.heatmap_queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    /// Pops the next scripted response, or an instant empty payload.
    fn next<T>(script: &Mutex<Script<T>>) -> (Duration, Result<Vec<T>, ApiError>) {
        script
            .lock()
            .ok()
            .and_then(|mut q| q.pop_front())
            .unwrap_or((Duration::ZERO, Ok(Vec::new())))
    }
}

impl MapApi for ScriptedMapApi {
    async fn campus_options(&self) -> Result<Vec<Campus>, ApiError> {
        Ok(self.campuses.lock().map(|c| c.clone()).unwrap_or_default())
    }

    async fn geofences(&self, query: &GeofenceQuery) -> Result<Vec<GeofenceArea>, ApiError> {
        self.geofence_calls.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut queries) = self.geofence_queries.lock() {
            queries.push(query.clone());
        }
        let (delay, result) = Self::next(&self.geofences);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn attendance_points(
        &self,
        query: &PointQuery,
    ) -> Result<Vec<AttendancePoint>, ApiError> {
        self.point_calls.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut queries) = self.point_queries.lock() {
            queries.push(query.clone());
        }
        let (delay, result) = Self::next(&self.points);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn heatmap_samples(&self, query: &HeatmapQuery) -> Result<Vec<HeatmapSample>, ApiError> {
        self.heatmap_calls.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut queries) = self.heatmap_queries.lock() {
            queries.push(query.clone());
        }
        let (delay, result) = Self::next(&self.heatmap);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }
}
