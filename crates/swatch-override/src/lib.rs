//! Temporary material overrides for a fixed set of meshes.
//!
//! [`MaterialOverride`] snapshots each mesh's material when it is captured, can
//! replace every material with clones of a template, and restores the captured
//! materials on demand.

mod controller;

pub use controller::{MaterialOverride, OverrideError, OverrideState};
