//! Dataset slice bookkeeping

use std::sync::Arc;

use crate::model::{AttendancePoint, DatasetCounts, GeofenceArea, HeatmapSample};

/// One immutable dataset slice plus the revision it was applied under.
///
/// The revision increments on every apply, so a consumer comparing
/// revisions sees every reference change, including a refetch that
/// happened to return identical content.
#[derive(Debug, Clone)]
pub struct DatasetSlice<T> {
    items: Arc<Vec<T>>,
    revision: u64,
}

impl<T> DatasetSlice<T> {
    pub(crate) fn new(items: Vec<T>, revision: u64) -> Self {
        Self {
            items: Arc::new(items),
            revision,
        }
    }

    /// The slice contents. Shared, never mutated in place.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Monotonic apply stamp; 0 means "never fetched".
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for DatasetSlice<T> {
    fn default() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            revision: 0,
        }
    }
}

/// Snapshot of the three dataset slices.
#[derive(Debug, Clone, Default)]
pub struct MapDatasets {
    pub geofences: DatasetSlice<GeofenceArea>,
    pub points: DatasetSlice<AttendancePoint>,
    pub heatmap: DatasetSlice<HeatmapSample>,
}

impl MapDatasets {
    /// Entity counts for stat display.
    pub fn counts(&self) -> DatasetCounts {
        DatasetCounts {
            geofences: self.geofences.len(),
            points: self.points.len(),
            heatmap: self.heatmap.len(),
        }
    }
}

/// Last error per dataset, `None` when the latest fetch succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetErrors {
    pub geofences: Option<String>,
    pub points: Option<String>,
    pub heatmap: Option<String>,
}

impl DatasetErrors {
    pub fn any(&self) -> bool {
        self.geofences.is_some() || self.points.is_some() || self.heatmap.is_some()
    }
}
