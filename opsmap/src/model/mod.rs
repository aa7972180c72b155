//! Spatial entity models
//!
//! Typed shapes for the three map datasets (geofences, attendance points,
//! heatmap samples), the filter and visibility state that drives fetching
//! and rendering, and the derived search/navigation types.

mod entities;
mod filter;
mod results;

pub use entities::{
    AttendancePoint, Campus, Direction, GeofenceArea, HeatmapSample, DEFAULT_RADIUS_M,
};
pub use filter::{DatasetCounts, DatasetKind, DateRange, FilterState, LayerVisibility};
pub use results::{FlyTarget, ResultKind, SearchResult};
