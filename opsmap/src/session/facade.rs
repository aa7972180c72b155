//! The session facade

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tokio::sync::broadcast;
use tracing::debug;

use crate::api::{ApiError, MapApi};
use crate::config::SessionConfig;
use crate::filter::{BatchError, BatchOutcome, DatasetErrors, FilterController, MapDatasets};
use crate::layer::{LayerManager, MapSurface};
use crate::model::{
    Campus, DatasetCounts, DatasetKind, DateRange, FilterState, LayerVisibility, SearchResult,
};
use crate::search;
use crate::view::{apply_camera, auto_center, FlyToSignal};

/// UI-side state guarded by one lock: render layers, the one-shot fly
/// signal, the search box text, and the auto-center change detector.
struct UiState<S: MapSurface> {
    layers: LayerManager<S>,
    fly: FlyToSignal,
    search_box: String,
    last_geofence_revision: u64,
}

/// Owning facade over the map subsystem.
///
/// Everything the page shell needs goes through here: filter mutations,
/// visibility toggles, search, and the read-only loading/error/count
/// summary. Methods take `&self`; overlapping filter calls race safely
/// through the controller's generation counter.
pub struct MapSession<A: MapApi, S: MapSurface> {
    api: Arc<A>,
    surface: Arc<S>,
    filter: FilterController<A>,
    ui: Mutex<UiState<S>>,
    config: SessionConfig,
}

impl<A: MapApi, S: MapSurface> MapSession<A, S> {
    /// Creates a session with the default filter for `today`: no campus,
    /// first day of the month through `today`.
    ///
    /// Nothing is fetched or rendered until [`start`](Self::start).
    pub fn new(api: Arc<A>, surface: Arc<S>, config: SessionConfig, today: NaiveDate) -> Self {
        let filter_state = FilterState {
            campus_id: None,
            range: DateRange::month_to_date(today),
        };
        Self {
            filter: FilterController::with_filter(Arc::clone(&api), filter_state),
            ui: Mutex::new(UiState {
                layers: LayerManager::new(Arc::clone(&surface)),
                fly: FlyToSignal::new(),
                search_box: String::new(),
                last_geofence_revision: 0,
            }),
            api,
            surface,
            config,
        }
    }

    /// [`new`](Self::new) with today taken from the local clock.
    pub fn with_local_today(api: Arc<A>, surface: Arc<S>, config: SessionConfig) -> Self {
        Self::new(api, surface, config, chrono::Local::now().date_naive())
    }

    /// Runs the initial fetch batch and first render.
    pub async fn start(&self) -> BatchOutcome {
        debug!("map session starting");
        self.refresh().await
    }

    /// Re-fetches everything for the current filter.
    pub async fn refresh(&self) -> BatchOutcome {
        let outcome = self.filter.refresh().await;
        self.after_batch();
        outcome
    }

    /// Sets the campus filter; re-fetches all three datasets.
    pub async fn set_campus(&self, campus_id: Option<String>) -> BatchOutcome {
        let outcome = self.filter.set_campus(campus_id).await;
        self.after_batch();
        outcome
    }

    /// Sets the date range filter; re-fetches all three datasets.
    pub async fn set_date_range(&self, range: DateRange) -> BatchOutcome {
        let outcome = self.filter.set_date_range(range).await;
        self.after_batch();
        outcome
    }

    /// Renders or removes one layer from the already-held datasets.
    /// Never triggers a fetch.
    pub fn set_layer_visible(&self, kind: DatasetKind, visible: bool) {
        let datasets = self.filter.datasets();
        if let Ok(mut ui) = self.ui.lock() {
            let visibility = ui.layers.visibility().with(kind, visible);
            ui.layers.set_visibility(visibility);
            ui.layers.reconcile(&datasets);
        }
    }

    pub fn visibility(&self) -> LayerVisibility {
        self.ui
            .lock()
            .map(|ui| ui.layers.visibility())
            .unwrap_or_default()
    }

    /// Recomputes the autocomplete list from the in-memory datasets.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        let datasets = self.filter.datasets();
        search::search(
            query,
            datasets.geofences.items(),
            datasets.points.items(),
            self.config.search_limit,
        )
    }

    /// Applies a selection: echoes the label into the search box, arms
    /// the one-shot fly signal and pans to it.
    pub fn select_result(&self, result: &SearchResult) {
        if let Ok(mut ui) = self.ui.lock() {
            ui.search_box = result.label.clone();
            ui.fly.emit(search::select(result));
        }
        self.pan_to_pending();
    }

    /// Consumes the pending fly signal, if armed. Safe to call from any
    /// re-render path: an already-consumed signal does nothing.
    pub fn pan_to_pending(&self) {
        let target = self.ui.lock().ok().and_then(|mut ui| ui.fly.take());
        if let Some(target) = target {
            self.surface
                .fly_to(target.coordinate, target.zoom, self.config.fly_duration);
        }
    }

    /// Current search box text (set by the last selection).
    pub fn search_box(&self) -> String {
        self.ui
            .lock()
            .map(|ui| ui.search_box.clone())
            .unwrap_or_default()
    }

    /// Campus options for the filter bar.
    pub async fn campus_options(&self) -> Result<Vec<Campus>, ApiError> {
        self.api.campus_options().await
    }

    pub fn filter(&self) -> FilterState {
        self.filter.filter()
    }

    /// Snapshot of the three dataset slices.
    pub fn datasets(&self) -> MapDatasets {
        self.filter.datasets()
    }

    /// Per-dataset entity counts for stat display.
    pub fn counts(&self) -> DatasetCounts {
        self.filter.datasets().counts()
    }

    pub fn is_loading(&self) -> bool {
        self.filter.is_loading()
    }

    pub fn last_errors(&self) -> DatasetErrors {
        self.filter.last_errors()
    }

    /// One notification per fetch batch with at least one failure.
    pub fn subscribe_errors(&self) -> broadcast::Receiver<BatchError> {
        self.filter.subscribe_errors()
    }

    /// Unmount lifecycle: removes every mounted layer from the surface,
    /// destroying the heatmap renderer rather than hiding it.
    pub fn close(&self) {
        debug!("map session closing");
        if let Ok(mut ui) = self.ui.lock() {
            ui.layers.teardown();
        }
    }

    /// Renders changed layers and reacts to geofence-set changes with an
    /// auto-center, after a batch settles.
    fn after_batch(&self) {
        let datasets = self.filter.datasets();
        if let Ok(mut ui) = self.ui.lock() {
            ui.layers.reconcile(&datasets);

            let revision = datasets.geofences.revision();
            if revision != ui.last_geofence_revision {
                ui.last_geofence_revision = revision;
                if let Some(command) = auto_center(datasets.geofences.items(), &self.config.camera)
                {
                    apply_camera(self.surface.as_ref(), command);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ScriptedMapApi;
    use crate::geo::LatLng;
    use crate::layer::{RecordingSurface, SurfaceCall};
    use crate::model::GeofenceArea;
    use std::time::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 23).unwrap()
    }

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

    fn session() -> (
        Arc<ScriptedMapApi>,
        Arc<RecordingSurface>,
        MapSession<ScriptedMapApi, RecordingSurface>,
    ) {
        let api = Arc::new(ScriptedMapApi::new());
        let surface = Arc::new(RecordingSurface::new());
        let session = MapSession::new(
            Arc::clone(&api),
            Arc::clone(&surface),
            SessionConfig::default(),
            today(),
        );
        (api, surface, session)
    }

    #[test]
    fn test_initial_filter_defaults_to_month_to_date() {
        let (_, _, session) = session();
        let filter = session.filter();
        assert!(filter.campus_id.is_none());
        assert_eq!(
            filter.range.start,
            Some(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap())
        );
        assert_eq!(filter.range.end, Some(today()));
    }

    #[tokio::test]
    async fn test_start_renders_and_auto_centers() {
        let (api, surface, session) = session();
        api.push_geofences(Duration::ZERO, Ok(vec![area("1", -6.2, 106.8)]));

        session.start().await;

        let calls = surface.calls();
        assert!(calls.contains(&SurfaceCall::SetGeofences(1)));
        assert_eq!(
            surface.last_camera(),
            Some(SurfaceCall::SetView {
                center: LatLng::new(-6.2, 106.8),
                zoom: 16
            })
        );
    }

    #[tokio::test]
    async fn test_select_result_flies_once() {
        let (api, surface, session) = session();
        api.push_geofences(Duration::ZERO, Ok(vec![area("1", -6.2, 106.8)]));
        session.start().await;

        let results = session.search("building");
        assert_eq!(results.len(), 1);
        session.select_result(&results[0]);

        assert_eq!(session.search_box(), "Building 1");
        let fly_calls = surface.count_calls(|c| matches!(c, SurfaceCall::FlyTo { .. }));
        assert_eq!(fly_calls, 1);

        // A re-render path consuming the signal again must not re-fly.
        session.pan_to_pending();
        let fly_calls = surface.count_calls(|c| matches!(c, SurfaceCall::FlyTo { .. }));
        assert_eq!(fly_calls, 1);
    }

    #[tokio::test]
    async fn test_close_tears_layers_down() {
        let (api, surface, session) = session();
        api.push_geofences(Duration::ZERO, Ok(vec![area("1", -6.2, 106.8)]));
        session.start().await;
        surface.clear();

        session.close();
        let calls = surface.calls();
        assert!(calls.contains(&SurfaceCall::ClearGeofences));
        assert!(calls.contains(&SurfaceCall::DestroyHeatmap));
    }
}
