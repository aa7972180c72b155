//! OpsMap - Geospatial facility map engine
//!
//! This library implements the map subsystem of a facility-operations
//! platform: three independently-sourced datasets (building geofences,
//! attendance points, heatmap density samples) fetched concurrently per
//! filter change, reconciled onto a shared render surface, with
//! cross-entity search and camera control on top.
//!
//! # High-Level API
//!
//! For most use cases, the [`session`] module provides a facade wiring the
//! pieces together:
//!
//! ```ignore
//! use opsmap::api::ReqwestMapApi;
//! use opsmap::config::SessionConfig;
//! use opsmap::layer::TracingSurface;
//! use opsmap::session::MapSession;
//! use std::sync::Arc;
//!
//! let api = Arc::new(ReqwestMapApi::new("https://ops.example.com/api"));
//! let surface = Arc::new(TracingSurface::new());
//! let session = MapSession::with_local_today(api, surface, SessionConfig::default());
//! session.start().await;
//! ```

pub mod api;
pub mod config;
pub mod filter;
pub mod geo;
pub mod layer;
pub mod logging;
pub mod model;
pub mod search;
pub mod session;
pub mod view;

/// Version of the OpsMap library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
