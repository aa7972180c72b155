//! Session tunables
//!
//! Defaults follow the map subsystem's fixed UX constants: close zoom 16
//! for a lone building, 50 px fit padding, zoom 18 / 1.2 s fly-to, and a
//! 10-entry search panel.

use std::time::Duration;

/// Auto-center parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraConfig {
    /// Zoom used when exactly one valid geofence exists.
    pub single_zoom: u8,
    /// Uniform padding when fitting bounds, in pixels.
    pub fit_padding_px: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            single_zoom: 16,
            fit_padding_px: 50,
        }
    }
}

/// Configuration for a [`MapSession`](crate::session::MapSession).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub camera: CameraConfig,
    /// Duration of the fly-to animation.
    pub fly_duration: Duration,
    /// Maximum entries in the search result panel.
    pub search_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            fly_duration: Duration::from_millis(1200),
            search_limit: crate::search::DEFAULT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_ux_constants() {
        let config = SessionConfig::default();
        assert_eq!(config.camera.single_zoom, 16);
        assert_eq!(config.camera.fit_padding_px, 50);
        assert_eq!(config.fly_duration, Duration::from_millis(1200));
        assert_eq!(config.search_limit, 10);
    }
}
