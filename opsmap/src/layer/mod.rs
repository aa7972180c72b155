//! Render layer lifecycle
//!
//! Projects the current dataset slices into renderable layer specs and
//! reconciles them onto the shared [`MapSurface`]. Reconciliation is an
//! explicit plan/apply step over (slice revision, visibility) pairs, so
//! layer lifecycle is testable without any render pass and a repeated
//! filter change can never leak a stale heatmap renderer.

mod manager;
mod surface;

pub use manager::{plan, LayerManager, LayerOp, RenderState};
pub use surface::{
    project_geofences, project_heatmap, project_points, CircleSpec, HeatPoint, MapSurface,
    MarkerSpec, MarkerStyle, RecordingSurface, SurfaceCall, TracingSurface,
};
