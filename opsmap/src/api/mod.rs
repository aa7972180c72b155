//! REST backend abstraction
//!
//! The four dataset endpoints are external collaborators; this module owns
//! the trait seam over them, the query shapes, and a reqwest-backed
//! implementation. Each endpoint fails independently and the caller (the
//! filter controller) decides what a failure means.
//!
//! [`ScriptedMapApi`] is an in-memory implementation with scriptable
//! per-call delays and failures, used by the test suites and offline
//! diagnostics.

mod client;
mod mock;
mod types;

pub use client::ReqwestMapApi;
pub use mock::ScriptedMapApi;
pub use types::{ApiError, GeofenceQuery, HeatmapQuery, MapApi, PointQuery};
