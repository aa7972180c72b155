//! The filter controller and its fetch batches

use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use super::datasets::{DatasetErrors, DatasetSlice, MapDatasets};
use crate::api::{ApiError, GeofenceQuery, HeatmapQuery, MapApi, PointQuery};
use crate::model::{DatasetKind, DateRange, FilterState};

/// Capacity of the batch-error broadcast channel.
const ERROR_CHANNEL_CAPACITY: usize = 16;

/// One notification per fetch batch that had at least one failure.
///
/// Rate limiting to a single toast per batch falls out of this shape: the
/// controller sends at most one `BatchError` per settled batch regardless
/// of how many of the three requests failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchError {
    /// Generation of the batch the failures belong to.
    pub generation: u64,
    /// Which datasets failed, in fixed geofences/points/heatmap order.
    pub failed: Vec<DatasetKind>,
}

/// What became of a fetch batch once all three requests settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub generation: u64,
    /// False when a newer filter change superseded this batch; its results
    /// were discarded.
    pub applied: bool,
    pub failed: Vec<DatasetKind>,
}

struct ControllerState {
    filter: FilterState,
    datasets: MapDatasets,
    /// Generation of the most recently issued batch.
    generation: u64,
    /// True from batch issue until the *current* generation settles.
    loading: bool,
    /// Monotonic apply stamp shared by the three slices.
    next_revision: u64,
    last_errors: DatasetErrors,
}

/// Owns the compound filter and the three raw dataset slices.
///
/// All other components read the datasets through cloned snapshots; only
/// the controller writes them. Batches run as three concurrent fetches and
/// each resolution is applied (or discarded as stale) independently, so a
/// slow dataset never blocks a fast one.
pub struct FilterController<A: MapApi> {
    api: Arc<A>,
    state: Arc<RwLock<ControllerState>>,
    error_tx: broadcast::Sender<BatchError>,
}

impl<A: MapApi> FilterController<A> {
    /// Creates a controller with an empty filter and empty datasets.
    pub fn new(api: Arc<A>) -> Self {
        Self::with_filter(api, FilterState::default())
    }

    /// Creates a controller with the given starting filter. No fetch is
    /// issued until [`refresh`](Self::refresh) or a setter is called.
    pub fn with_filter(api: Arc<A>, filter: FilterState) -> Self {
        let (error_tx, _) = broadcast::channel(ERROR_CHANNEL_CAPACITY);
        Self {
            api,
            state: Arc::new(RwLock::new(ControllerState {
                filter,
                datasets: MapDatasets::default(),
                generation: 0,
                loading: false,
                next_revision: 0,
                last_errors: DatasetErrors::default(),
            })),
            error_tx,
        }
    }

    /// Current filter snapshot.
    pub fn filter(&self) -> FilterState {
        self.state
            .read()
            .map(|s| s.filter.clone())
            .unwrap_or_default()
    }

    /// Snapshot of the three dataset slices.
    pub fn datasets(&self) -> MapDatasets {
        self.state
            .read()
            .map(|s| s.datasets.clone())
            .unwrap_or_default()
    }

    /// True from batch issue until all three requests of the current
    /// generation have settled. A superseded generation's settlement does
    /// not clear this.
    pub fn is_loading(&self) -> bool {
        self.state.read().map(|s| s.loading).unwrap_or(false)
    }

    /// Per-dataset error from the latest settled fetch of each slice.
    pub fn last_errors(&self) -> DatasetErrors {
        self.state
            .read()
            .map(|s| s.last_errors.clone())
            .unwrap_or_default()
    }

    /// Subscribes to the once-per-failed-batch error notifications.
    pub fn subscribe_errors(&self) -> broadcast::Receiver<BatchError> {
        self.error_tx.subscribe()
    }

    /// Sets the campus filter and runs a fetch batch.
    pub async fn set_campus(&self, campus_id: Option<String>) -> BatchOutcome {
        if let Ok(mut state) = self.state.write() {
            state.filter.campus_id = campus_id;
        }
        self.run_batch().await
    }

    /// Sets the date range filter and runs a fetch batch.
    pub async fn set_date_range(&self, range: DateRange) -> BatchOutcome {
        if let Ok(mut state) = self.state.write() {
            state.filter.range = range;
        }
        self.run_batch().await
    }

    /// Re-runs the batch for the current filter (initial load, retry).
    pub async fn refresh(&self) -> BatchOutcome {
        self.run_batch().await
    }

    /// Issues the three fetches concurrently under a fresh generation.
    ///
    /// There is deliberately no request timeout: a hung request keeps its
    /// generation loading until a later filter change supersedes it.
    async fn run_batch(&self) -> BatchOutcome {
        let (generation, filter) = match self.state.write() {
            Ok(mut state) => {
                state.generation += 1;
                state.loading = true;
                (state.generation, state.filter.clone())
            }
            Err(_) => {
                return BatchOutcome {
                    generation: 0,
                    applied: false,
                    failed: Vec::new(),
                }
            }
        };

        debug!(
            generation,
            campus = filter.campus_id.as_deref().unwrap_or("-"),
            "fetch batch issued"
        );

        let geofence_query = GeofenceQuery {
            campus_id: filter.campus_id.clone(),
        };
        let point_query = PointQuery {
            campus_id: filter.campus_id.clone(),
            range: filter.range,
        };
        let heatmap_query = HeatmapQuery {
            campus_id: filter.campus_id.clone(),
            range: filter.range,
        };

        // Three independent fetches; each applies its own resolution so a
        // failure or a slow response in one never blocks the other two.
        let geofences = async {
            let result = self.api.geofences(&geofence_query).await;
            self.apply_geofences(generation, result)
        };
        let points = async {
            let result = self.api.attendance_points(&point_query).await;
            self.apply_points(generation, result)
        };
        let heatmap = async {
            let result = self.api.heatmap_samples(&heatmap_query).await;
            self.apply_heatmap(generation, result)
        };
        let (geofences_failed, points_failed, heatmap_failed) =
            tokio::join!(geofences, points, heatmap);

        let mut failed = Vec::new();
        if geofences_failed {
            failed.push(DatasetKind::Geofences);
        }
        if points_failed {
            failed.push(DatasetKind::Points);
        }
        if heatmap_failed {
            failed.push(DatasetKind::Heatmap);
        }

        self.settle(generation, failed)
    }

    /// Returns true when the resolution was applied as a failure.
    /// Stale resolutions are discarded silently and never count as failed.
    fn apply_geofences(
        &self,
        generation: u64,
        result: Result<Vec<crate::model::GeofenceArea>, ApiError>,
    ) -> bool {
        let Ok(mut state) = self.state.write() else {
            return false;
        };
        if generation != state.generation {
            trace!(
                generation,
                current = state.generation,
                "discarding stale geofence resolution"
            );
            return false;
        }
        state.next_revision += 1;
        let revision = state.next_revision;
        match result {
            Ok(items) => {
                debug!(generation, count = items.len(), "geofences applied");
                state.datasets.geofences = DatasetSlice::new(items, revision);
                state.last_errors.geofences = None;
                false
            }
            Err(e) => {
                warn!(generation, error = %e, "geofence fetch failed, clearing slice");
                state.datasets.geofences = DatasetSlice::new(Vec::new(), revision);
                state.last_errors.geofences = Some(e.to_string());
                true
            }
        }
    }

    fn apply_points(
        &self,
        generation: u64,
        result: Result<Vec<crate::model::AttendancePoint>, ApiError>,
    ) -> bool {
        let Ok(mut state) = self.state.write() else {
            return false;
        };
        if generation != state.generation {
            trace!(
                generation,
                current = state.generation,
                "discarding stale attendance-point resolution"
            );
            return false;
        }
        state.next_revision += 1;
        let revision = state.next_revision;
        match result {
            Ok(items) => {
                debug!(generation, count = items.len(), "attendance points applied");
                state.datasets.points = DatasetSlice::new(items, revision);
                state.last_errors.points = None;
                false
            }
            Err(e) => {
                warn!(generation, error = %e, "attendance-point fetch failed, clearing slice");
                state.datasets.points = DatasetSlice::new(Vec::new(), revision);
                state.last_errors.points = Some(e.to_string());
                true
            }
        }
    }

    fn apply_heatmap(
        &self,
        generation: u64,
        result: Result<Vec<crate::model::HeatmapSample>, ApiError>,
    ) -> bool {
        let Ok(mut state) = self.state.write() else {
            return false;
        };
        if generation != state.generation {
            trace!(
                generation,
                current = state.generation,
                "discarding stale heatmap resolution"
            );
            return false;
        }
        state.next_revision += 1;
        let revision = state.next_revision;
        match result {
            Ok(items) => {
                debug!(generation, count = items.len(), "heatmap samples applied");
                state.datasets.heatmap = DatasetSlice::new(items, revision);
                state.last_errors.heatmap = None;
                false
            }
            Err(e) => {
                warn!(generation, error = %e, "heatmap fetch failed, clearing slice");
                state.datasets.heatmap = DatasetSlice::new(Vec::new(), revision);
                state.last_errors.heatmap = Some(e.to_string());
                true
            }
        }
    }

    /// Marks the batch settled. Only the current generation may clear the
    /// loading flag or raise the (single) error notification.
    fn settle(&self, generation: u64, failed: Vec<DatasetKind>) -> BatchOutcome {
        let applied = self
            .state
            .write()
            .map(|mut state| {
                if state.generation == generation {
                    state.loading = false;
                    true
                } else {
                    false
                }
            })
            .unwrap_or(false);

        if applied && !failed.is_empty() {
            warn!(generation, failed = ?failed, "fetch batch settled with failures");
            let _ = self.error_tx.send(BatchError {
                generation,
                failed: failed.clone(),
            });
        } else {
            trace!(generation, applied, "fetch batch settled");
        }

        BatchOutcome {
            generation,
            applied,
            failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ScriptedMapApi;
    use crate::geo::LatLng;
    use crate::model::GeofenceArea;
    use std::time::Duration;

    fn area(id: &str, lat: f64, lng: f64) -> GeofenceArea {
        GeofenceArea {
            id: id.to_string(),
            label: format!("Building {id}"),
            campus_id: None,
            campus_label: None,
            center: LatLng::new(lat, lng),
            radius_meters: 100.0,
        }
    }

    fn controller() -> (Arc<ScriptedMapApi>, FilterController<ScriptedMapApi>) {
        let api = Arc::new(ScriptedMapApi::new());
        let controller = FilterController::new(Arc::clone(&api));
        (api, controller)
    }

    #[tokio::test]
    async fn test_refresh_applies_all_three_slices() {
        let (api, controller) = controller();
        api.push_geofences(Duration::ZERO, Ok(vec![area("1", -6.2, 106.8)]));

        let outcome = controller.refresh().await;
        assert!(outcome.applied);
        assert!(outcome.failed.is_empty());

        let datasets = controller.datasets();
        assert_eq!(datasets.geofences.len(), 1);
        assert_eq!(datasets.geofences.revision(), 1);
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_stale_batch_is_discarded() {
        let (api, controller) = controller();
        // Batch 1 is slow and would deliver building 1; batch 2 is instant
        // and delivers building 2. Batch 1 settles last but must lose.
        api.push_geofences(Duration::from_millis(50), Ok(vec![area("1", -6.2, 106.8)]));
        api.push_geofences(Duration::ZERO, Ok(vec![area("2", -6.3, 106.9)]));

        let slow = controller.refresh();
        let fast = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            controller.set_campus(Some("3".to_string())).await
        };
        let (slow_outcome, fast_outcome) = tokio::join!(slow, fast);

        assert!(!slow_outcome.applied);
        assert!(fast_outcome.applied);

        let datasets = controller.datasets();
        assert_eq!(datasets.geofences.len(), 1);
        assert_eq!(datasets.geofences.items()[0].id, "2");
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_partial_failure_clears_slice_and_notifies_once() {
        let (api, controller) = controller();
        let mut errors = controller.subscribe_errors();
        api.push_geofences(Duration::ZERO, Ok(vec![area("1", -6.2, 106.8)]));
        api.push_heatmap(
            Duration::ZERO,
            Err(ApiError::Status {
                endpoint: "heatmap-samples",
                status: 500,
            }),
        );

        let outcome = controller.refresh().await;
        assert!(outcome.applied);
        assert_eq!(outcome.failed, vec![DatasetKind::Heatmap]);

        let datasets = controller.datasets();
        assert_eq!(datasets.geofences.len(), 1);
        assert!(datasets.heatmap.is_empty());
        assert!(controller.last_errors().heatmap.is_some());
        assert!(controller.last_errors().geofences.is_none());
        assert!(!controller.is_loading());

        let notification = errors.try_recv().unwrap();
        assert_eq!(notification.failed, vec![DatasetKind::Heatmap]);
        assert!(errors.try_recv().is_err(), "only one notification per batch");
    }

    #[tokio::test]
    async fn test_two_failures_still_one_notification() {
        let (api, controller) = controller();
        let mut errors = controller.subscribe_errors();
        api.push_points(
            Duration::ZERO,
            Err(ApiError::Transport("connection reset".to_string())),
        );
        api.push_heatmap(
            Duration::ZERO,
            Err(ApiError::Status {
                endpoint: "heatmap-samples",
                status: 502,
            }),
        );

        let outcome = controller.refresh().await;
        assert_eq!(
            outcome.failed,
            vec![DatasetKind::Points, DatasetKind::Heatmap]
        );
        let notification = errors.try_recv().unwrap();
        assert_eq!(notification.failed.len(), 2);
        assert!(errors.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_success_after_failure_clears_error() {
        let (api, controller) = controller();
        api.push_heatmap(
            Duration::ZERO,
            Err(ApiError::Status {
                endpoint: "heatmap-samples",
                status: 500,
            }),
        );
        controller.refresh().await;
        assert!(controller.last_errors().heatmap.is_some());

        controller.refresh().await;
        assert!(controller.last_errors().heatmap.is_none());
    }

    #[tokio::test]
    async fn test_queries_carry_filter_fields() {
        let (api, controller) = controller();
        controller.set_campus(Some("3".to_string())).await;

        let geofence_queries = api.recorded_geofence_queries();
        assert_eq!(geofence_queries.len(), 1);
        assert_eq!(geofence_queries[0].campus_id.as_deref(), Some("3"));

        // Date range unset: the point query must carry no date params.
        let point_queries = api.recorded_point_queries();
        assert_eq!(point_queries.len(), 1);
        let pairs = point_queries[0].query_pairs();
        assert_eq!(pairs, vec![("campusId", "3".to_string())]);
    }

    #[tokio::test]
    async fn test_loading_clears_only_for_current_generation() {
        let (api, controller) = controller();
        api.push_geofences(Duration::from_millis(50), Ok(Vec::new()));

        let slow = controller.refresh();
        let probe = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            assert!(controller.is_loading());
            let outcome = controller.refresh().await;
            // The fast second batch settles while the first is in flight.
            assert!(outcome.applied);
            assert!(!controller.is_loading());
        };
        tokio::join!(slow, probe);
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_each_batch_calls_all_three_endpoints() {
        let (api, controller) = controller();
        controller.refresh().await;
        controller.set_campus(Some("1".to_string())).await;
        assert_eq!(api.geofence_calls(), 2);
        assert_eq!(api.point_calls(), 2);
        assert_eq!(api.heatmap_calls(), 2);
    }
}
