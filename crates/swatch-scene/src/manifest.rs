//! RON scene manifest: a material library plus meshes referencing it by name.

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use swatch_materials::{LibraryError, MaterialEntry, MaterialLibrary};
use thiserror::Error;
use tracing::info;

use crate::scene::{Scene, SceneError};

/// Errors returned while building a scene from a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// I/O error reading the manifest file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// RON deserialization error.
    #[error("ron parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// Material library construction failed.
    #[error("material library: {0}")]
    Library(#[from] LibraryError),

    /// Scene rejected a mesh.
    #[error("scene: {0}")]
    Scene(#[from] SceneError),

    /// A mesh references a material that is not in the library.
    #[error("mesh `{mesh}` references unknown material `{material}`")]
    UnknownMaterial {
        /// Mesh name.
        mesh: String,
        /// Missing material name.
        material: String,
    },
}

/// Top-level RON scene description.
#[derive(Debug, Deserialize)]
pub struct SceneManifest {
    /// Named materials available to meshes and as override templates.
    #[serde(default)]
    pub materials: Vec<MaterialEntry>,
    /// Meshes, in registration order.
    #[serde(default)]
    pub meshes: Vec<MeshEntry>,
}

/// A mesh entry in the manifest.
#[derive(Debug, Deserialize)]
pub struct MeshEntry {
    /// Unique mesh name.
    pub name: String,
    /// Library material name, or `None` for a mesh without material.
    #[serde(default)]
    pub material: Option<String>,
}

impl Scene {
    /// Builds a scene from a RON manifest file.
    pub fn from_manifest(path: &Path) -> Result<(Self, MaterialLibrary), ManifestError> {
        let contents = std::fs::read_to_string(path)?;
        let loaded = Self::from_manifest_str(&contents)?;
        info!(
            path = %path.display(),
            meshes = loaded.0.mesh_count(),
            materials = loaded.1.len(),
            "scene loaded"
        );
        Ok(loaded)
    }

    /// Builds a scene from a RON manifest string.
    ///
    /// Each library material becomes one instance in the store; meshes naming the
    /// same material share that instance.
    pub fn from_manifest_str(ron_str: &str) -> Result<(Self, MaterialLibrary), ManifestError> {
        let manifest: SceneManifest = ron::from_str(ron_str)?;
        let library = MaterialLibrary::from_entries(manifest.materials)?;

        let mut scene = Scene::new();
        let mut instances = FxHashMap::default();
        for def in library.iter() {
            instances.insert(def.name.clone(), scene.add_material(def.clone()));
        }

        for entry in manifest.meshes {
            let material = match entry.material {
                Some(name) => match instances.get(&name) {
                    Some(&handle) => Some(handle),
                    None => {
                        return Err(ManifestError::UnknownMaterial {
                            mesh: entry.name,
                            material: name,
                        });
                    }
                },
                None => None,
            };
            scene.add_mesh(entry.name, material)?;
        }

        Ok((scene, library))
    }
}
