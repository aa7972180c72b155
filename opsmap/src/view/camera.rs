//! Auto-center computation

use crate::config::CameraConfig;
use crate::geo::{GeoBounds, LatLng};
use crate::layer::MapSurface;
use crate::model::GeofenceArea;

/// A computed camera move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraCommand {
    /// Center on a single coordinate at a fixed zoom.
    Center { center: LatLng, zoom: u8 },
    /// Fit the view to a bounding box with uniform padding.
    FitBounds { bounds: GeoBounds, padding_px: u32 },
}

/// Computes the camera move for the current geofence set.
///
/// Invoked whenever the geofence slice changes, including to or from
/// empty. Only renderable geofences count: zero of them is a no-op
/// (`None`), exactly one centers close on it, two or more fit the minimal
/// box enclosing every valid center.
pub fn auto_center(areas: &[GeofenceArea], config: &CameraConfig) -> Option<CameraCommand> {
    let mut centers = areas
        .iter()
        .filter(|area| area.is_renderable())
        .map(|area| area.center);

    let first = centers.next()?;
    match centers.next() {
        None => Some(CameraCommand::Center {
            center: first,
            zoom: config.single_zoom,
        }),
        Some(second) => {
            let mut bounds = GeoBounds::from_point(first.lat, first.lng);
            bounds.expand(second.lat, second.lng);
            for center in centers {
                bounds.expand(center.lat, center.lng);
            }
            Some(CameraCommand::FitBounds {
                bounds,
                padding_px: config.fit_padding_px,
            })
        }
    }
}

/// Applies a computed move to the surface.
pub fn apply_camera<S: MapSurface>(surface: &S, command: CameraCommand) {
    match command {
        CameraCommand::Center { center, zoom } => surface.set_view(center, zoom),
        CameraCommand::FitBounds { bounds, padding_px } => surface.fit_bounds(bounds, padding_px),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(id: &str, lat: f64, lng: f64) -> GeofenceArea {
        GeofenceArea {
            id: id.to_string(),
            label: format!("Building {id}"),
            campus_id: None,
            campus_label: None,
            center: LatLng::new(lat, lng),
            radius_meters: 100.0,
        }
    }

    fn config() -> CameraConfig {
        CameraConfig::default()
    }

    #[test]
    fn test_no_geofences_is_noop() {
        assert!(auto_center(&[], &config()).is_none());
    }

    #[test]
    fn test_only_invalid_geofences_is_noop() {
        let ghosts = vec![
            area("1", f64::NAN, 106.8),
            area("2", -6.2, f64::INFINITY),
        ];
        assert!(auto_center(&ghosts, &config()).is_none());
    }

    #[test]
    fn test_single_geofence_centers_close() {
        let areas = vec![area("1", -6.2, 106.8)];
        let command = auto_center(&areas, &config()).unwrap();
        assert_eq!(
            command,
            CameraCommand::Center {
                center: LatLng::new(-6.2, 106.8),
                zoom: 16
            }
        );
    }

    #[test]
    fn test_single_valid_among_invalid_still_centers() {
        let areas = vec![area("1", f64::NAN, 106.8), area("2", -6.2, 106.8)];
        let command = auto_center(&areas, &config()).unwrap();
        assert!(matches!(command, CameraCommand::Center { zoom: 16, .. }));
    }

    #[test]
    fn test_two_geofences_fit_bounds_with_padding() {
        let areas = vec![area("1", -6.20, 106.80), area("2", -6.22, 106.90)];
        let command = auto_center(&areas, &config()).unwrap();
        let CameraCommand::FitBounds { bounds, padding_px } = command else {
            panic!("expected FitBounds, got {command:?}");
        };
        assert!(bounds.contains(LatLng::new(-6.20, 106.80)));
        assert!(bounds.contains(LatLng::new(-6.22, 106.90)));
        assert!(padding_px > 0);
        assert_eq!(padding_px, 50);
    }

    #[test]
    fn test_bounds_contain_every_valid_member() {
        let areas = vec![
            area("1", -6.1, 106.7),
            area("2", -6.3, 106.9),
            area("3", -6.2, 107.1),
            area("4", f64::NAN, 0.0),
        ];
        let Some(CameraCommand::FitBounds { bounds, .. }) = auto_center(&areas, &config()) else {
            panic!("expected FitBounds");
        };
        for a in areas.iter().filter(|a| a.is_renderable()) {
            assert!(bounds.contains(a.center));
        }
    }
}
