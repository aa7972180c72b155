//! Map session orchestration
//!
//! [`MapSession`] is the facade the surrounding page shell talks to. It
//! wires filter changes through the fetch batch into layer reconciliation
//! and camera moves, and owns the surface handles for the mount lifecycle:
//! layers live exactly as long as the session, never as module globals.

mod facade;

pub use facade::MapSession;
