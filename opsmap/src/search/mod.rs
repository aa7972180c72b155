//! Cross-entity search
//!
//! Builds the autocomplete list from the in-memory geofence and
//! attendance-point datasets. No network calls: the index is recomputed
//! from scratch on every keystroke and never cached across filter changes.

mod index;

pub use index::{search, select, DEFAULT_LIMIT, SELECT_ZOOM};
