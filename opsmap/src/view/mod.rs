//! Camera control
//!
//! Auto-center reacts to geofence dataset changes; fly-to consumes the
//! one-shot signal a search selection emits. Both go through the shared
//! surface's idempotent camera operations, so they tolerate firing in
//! either order (last applied wins).

mod camera;
mod flyto;

pub use camera::{auto_center, apply_camera, CameraCommand};
pub use flyto::FlyToSignal;
