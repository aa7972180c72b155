//! Geographic primitives
//!
//! Provides the WGS84 coordinate pair and axis-aligned bounding box used
//! throughout the map engine. Precision is "good enough for visual
//! inspection on a campus-scale map", not survey-grade geodesy.

mod types;

pub use types::{GeoBounds, LatLng, MAX_LAT, MAX_LNG, MIN_LAT, MIN_LNG};
