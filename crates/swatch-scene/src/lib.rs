//! Minimal scene model hosting meshes and material instances.
//!
//! Meshes are addressed by [`MeshId`], assigned once at registration and never reused.
//! Material instances live in the scene's store and are addressed by [`MaterialHandle`];
//! cloning an instance yields a new handle over an independent copy. The [`MaterialHost`]
//! trait is the seam other engines implement to drive material overrides.

mod host;
mod manifest;
mod scene;

pub use host::MaterialHost;
pub use manifest::{ManifestError, MeshEntry, SceneManifest};
pub use scene::{MaterialHandle, Mesh, MeshId, Scene, SceneError};
