//! Filter, visibility and dataset bookkeeping types

use std::fmt;

use chrono::{Datelike, NaiveDate};

/// Inclusive calendar-date range; either bound may be open.
///
/// Dates carry no time-of-day. Formatting for the wire happens in the
/// query types, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Both bounds open: no date filtering.
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// The initial-load default: first day of `today`'s month through
    /// `today`.
    pub fn month_to_date(today: NaiveDate) -> Self {
        let start = today.with_day(1).unwrap_or(today);
        Self {
            start: Some(start),
            end: Some(today),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// The compound filter driving all three dataset fetches.
///
/// Any mutation invalidates in-flight fetches (by generation) and starts a
/// new batch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub campus_id: Option<String>,
    pub range: DateRange,
}

/// Per-layer visibility flags.
///
/// Orthogonal to [`FilterState`]: toggling a flag only renders or removes
/// an already-held dataset, it never triggers a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerVisibility {
    pub geofences: bool,
    pub points: bool,
    pub heatmap: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            geofences: true,
            points: true,
            heatmap: true,
        }
    }
}

impl LayerVisibility {
    /// Returns a copy with the named layer set to `visible`.
    pub fn with(self, kind: DatasetKind, visible: bool) -> Self {
        let mut next = self;
        match kind {
            DatasetKind::Geofences => next.geofences = visible,
            DatasetKind::Points => next.points = visible,
            DatasetKind::Heatmap => next.heatmap = visible,
        }
        next
    }
}

/// Identifies one of the three independently-fetched datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    Geofences,
    Points,
    Heatmap,
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geofences => write!(f, "geofences"),
            Self::Points => write!(f, "attendance points"),
            Self::Heatmap => write!(f, "heatmap samples"),
        }
    }
}

/// Per-dataset entity counts for stat display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DatasetCounts {
    pub geofences: usize,
    pub points: usize,
    pub heatmap: usize,
}
