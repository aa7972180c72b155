//! Filter state and concurrent dataset acquisition
//!
//! [`FilterController`] exclusively owns the compound filter and the three
//! raw dataset slices. Every filter mutation issues a generation-tagged
//! batch of three concurrent fetches; resolutions belonging to a
//! superseded generation are discarded, failures empty their slice and are
//! surfaced once per batch.

mod controller;
mod datasets;

pub use controller::{BatchError, BatchOutcome, FilterController};
pub use datasets::{DatasetErrors, DatasetSlice, MapDatasets};
