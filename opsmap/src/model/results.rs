//! Derived navigation types
//!
//! Search results are rebuilt from the in-memory datasets on every
//! keystroke and never cached across filter changes. A [`FlyTarget`] is an
//! ephemeral write-once-consume-once pan signal, not durable state.

use std::fmt;

use crate::geo::LatLng;

/// What kind of entity a search result points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    /// A building geofence.
    Geofence,
    /// A member derived from attendance points.
    Member,
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geofence => write!(f, "geofence"),
            Self::Member => write!(f, "member"),
        }
    }
}

/// One entry in the cross-entity autocomplete list.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub kind: ResultKind,
    pub label: String,
    pub sublabel: String,
    pub coordinate: LatLng,
    /// Id of the source entity (geofence id or attendance point id).
    pub source_id: String,
}

/// Ephemeral camera pan signal emitted by a search selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyTarget {
    pub coordinate: LatLng,
    pub zoom: u8,
}
