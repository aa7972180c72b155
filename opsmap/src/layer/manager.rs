//! Layer reconciliation

use std::sync::Arc;

use tracing::debug;

use super::surface::{project_geofences, project_heatmap, project_points, MapSurface};
use crate::filter::MapDatasets;
use crate::model::LayerVisibility;

/// What is currently mounted on the surface: the slice revision each layer
/// was rendered from, `None` when the layer is unmounted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderState {
    pub geofences: Option<u64>,
    pub points: Option<u64>,
    pub heatmap: Option<u64>,
}

/// One reconciliation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerOp {
    SetGeofences,
    ClearGeofences,
    SetPoints,
    ClearPoints,
    CreateHeatmap,
    UpdateHeatmap,
    DestroyHeatmap,
}

/// Computes the ops taking `state` to what `(datasets, visibility)` wants.
///
/// Pure: this is the declarative replacement for add/remove calls strewn
/// through a render pass. A layer re-renders only when its slice revision
/// changed or its visibility flipped; the heatmap distinguishes in-place
/// point-set updates from renderer creation so toggling cannot leak
/// renderer state and refetching cannot flicker it.
pub fn plan(state: RenderState, datasets: &MapDatasets, visibility: LayerVisibility) -> Vec<LayerOp> {
    let mut ops = Vec::new();

    match (visibility.geofences, state.geofences) {
        (true, Some(rendered)) if rendered != datasets.geofences.revision() => {
            ops.push(LayerOp::SetGeofences)
        }
        (true, None) => ops.push(LayerOp::SetGeofences),
        (false, Some(_)) => ops.push(LayerOp::ClearGeofences),
        _ => {}
    }

    match (visibility.points, state.points) {
        (true, Some(rendered)) if rendered != datasets.points.revision() => {
            ops.push(LayerOp::SetPoints)
        }
        (true, None) => ops.push(LayerOp::SetPoints),
        (false, Some(_)) => ops.push(LayerOp::ClearPoints),
        _ => {}
    }

    match (visibility.heatmap, state.heatmap) {
        (true, Some(rendered)) if rendered != datasets.heatmap.revision() => {
            ops.push(LayerOp::UpdateHeatmap)
        }
        (true, None) => ops.push(LayerOp::CreateHeatmap),
        (false, Some(_)) => ops.push(LayerOp::DestroyHeatmap),
        _ => {}
    }

    ops
}

/// Owns per-layer visibility and drives the surface from dataset snapshots.
///
/// Never fetches: it reacts to slice revision changes and visibility
/// flips, nothing else.
pub struct LayerManager<S: MapSurface> {
    surface: Arc<S>,
    visibility: LayerVisibility,
    state: RenderState,
}

impl<S: MapSurface> LayerManager<S> {
    pub fn new(surface: Arc<S>) -> Self {
        Self {
            surface,
            visibility: LayerVisibility::default(),
            state: RenderState::default(),
        }
    }

    pub fn visibility(&self) -> LayerVisibility {
        self.visibility
    }

    /// Updates the flags; callers follow with [`reconcile`](Self::reconcile).
    pub fn set_visibility(&mut self, visibility: LayerVisibility) {
        self.visibility = visibility;
    }

    /// Current mounted state, for inspection.
    pub fn render_state(&self) -> RenderState {
        self.state
    }

    /// Plans and applies the layer diff for the given snapshot.
    pub fn reconcile(&mut self, datasets: &MapDatasets) -> Vec<LayerOp> {
        let ops = plan(self.state, datasets, self.visibility);
        if !ops.is_empty() {
            debug!(ops = ?ops, "reconciling layers");
        }
        for op in &ops {
            match op {
                LayerOp::SetGeofences => self
                    .surface
                    .set_geofences(&project_geofences(datasets.geofences.items())),
                LayerOp::ClearGeofences => self.surface.clear_geofences(),
                LayerOp::SetPoints => self
                    .surface
                    .set_points(&project_points(datasets.points.items())),
                LayerOp::ClearPoints => self.surface.clear_points(),
                LayerOp::CreateHeatmap => self
                    .surface
                    .create_heatmap(&project_heatmap(datasets.heatmap.items())),
                LayerOp::UpdateHeatmap => self
                    .surface
                    .update_heatmap(&project_heatmap(datasets.heatmap.items())),
                LayerOp::DestroyHeatmap => self.surface.destroy_heatmap(),
            }
        }
        self.state = RenderState {
            geofences: self
                .visibility
                .geofences
                .then_some(datasets.geofences.revision()),
            points: self.visibility.points.then_some(datasets.points.revision()),
            heatmap: self.visibility.heatmap.then_some(datasets.heatmap.revision()),
        };
        ops
    }

    /// Unmounts everything still on the surface. Part of the session's
    /// unmount lifecycle, which is what keeps the heatmap renderer from
    /// outliving the component.
    pub fn teardown(&mut self) {
        if self.state.geofences.is_some() {
            self.surface.clear_geofences();
        }
        if self.state.points.is_some() {
            self.surface.clear_points();
        }
        if self.state.heatmap.is_some() {
            self.surface.destroy_heatmap();
        }
        self.state = RenderState::default();
    }
}
