//! [`Scene`] storage: meshes keyed by [`MeshId`], material instances keyed by [`MaterialHandle`].

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashMap;
use swatch_materials::MaterialDef;
use thiserror::Error;
use tracing::debug;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Stable identifier of a mesh, assigned by [`Scene::add_mesh`].
///
/// Ids increase monotonically and are never reused, even after removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeshId(u32);

impl MeshId {
    /// Raw index value.
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MeshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mesh#{}", self.0)
    }
}

/// Identity of one material instance in the scene's store.
///
/// Two handles are the same instance iff they compare equal. Content equality is
/// a comparison of the [`MaterialDef`]s behind them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaterialHandle(u32);

impl MaterialHandle {
    /// Raw index value.
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MaterialHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "material#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// SceneError
// ---------------------------------------------------------------------------

/// Errors returned by scene lookups and mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// No mesh with this id is registered.
    #[error("{0} is not in the scene")]
    MeshNotFound(MeshId),

    /// No material instance with this handle exists.
    #[error("{0} is not in the scene")]
    MaterialNotFound(MaterialHandle),

    /// A mesh with the same name is already registered.
    #[error("duplicate mesh name: {0}")]
    DuplicateMeshName(String),

    /// The material instance is still assigned to a mesh.
    #[error("{material} is still assigned to {mesh}")]
    MaterialInUse {
        /// Instance that was to be removed.
        material: MaterialHandle,
        /// A mesh still referencing it.
        mesh: MeshId,
    },
}

// ---------------------------------------------------------------------------
// Mesh
// ---------------------------------------------------------------------------

/// A renderable object with a single material slot.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    name: String,
    material: Option<MaterialHandle>,
}

impl Mesh {
    /// Unique name within the scene.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Currently assigned material instance, if any.
    pub fn material(&self) -> Option<MaterialHandle> {
        self.material
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// Owns meshes and material instances.
#[derive(Debug, Default)]
pub struct Scene {
    /// Ordered by id, which is also registration order.
    meshes: BTreeMap<MeshId, Mesh>,
    mesh_names: FxHashMap<String, MeshId>,
    materials: FxHashMap<MaterialHandle, MaterialDef>,
    next_mesh: u32,
    next_material: u32,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a material value and returns the handle of the new instance.
    pub fn add_material(&mut self, def: MaterialDef) -> MaterialHandle {
        let handle = MaterialHandle(self.next_material);
        self.next_material += 1;
        self.materials.insert(handle, def);
        handle
    }

    /// Looks up a material instance.
    pub fn material(&self, handle: MaterialHandle) -> Option<&MaterialDef> {
        self.materials.get(&handle)
    }

    /// Mutable access to a material instance. Edits are visible to every mesh
    /// sharing this instance and to no other instance.
    pub fn material_mut(&mut self, handle: MaterialHandle) -> Option<&mut MaterialDef> {
        self.materials.get_mut(&handle)
    }

    /// Removes a material instance from the store.
    ///
    /// # Errors
    ///
    /// [`SceneError::MaterialNotFound`] if the handle is unknown, or
    /// [`SceneError::MaterialInUse`] if a mesh still has it assigned.
    pub fn remove_material(&mut self, handle: MaterialHandle) -> Result<MaterialDef, SceneError> {
        if let Some((&mesh, _)) = self
            .meshes
            .iter()
            .find(|(_, m)| m.material == Some(handle))
        {
            return Err(SceneError::MaterialInUse {
                material: handle,
                mesh,
            });
        }
        self.materials
            .remove(&handle)
            .ok_or(SceneError::MaterialNotFound(handle))
    }

    /// Number of material instances in the store.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Registers a mesh and assigns it a fresh [`MeshId`].
    ///
    /// # Errors
    ///
    /// [`SceneError::DuplicateMeshName`] if the name is taken, or
    /// [`SceneError::MaterialNotFound`] if `material` is not in the store.
    pub fn add_mesh(
        &mut self,
        name: impl Into<String>,
        material: Option<MaterialHandle>,
    ) -> Result<MeshId, SceneError> {
        let name = name.into();
        if self.mesh_names.contains_key(&name) {
            return Err(SceneError::DuplicateMeshName(name));
        }
        if let Some(handle) = material {
            self.check_material(handle)?;
        }

        let id = MeshId(self.next_mesh);
        self.next_mesh += 1;
        debug!(%id, %name, "mesh added");
        self.mesh_names.insert(name.clone(), id);
        self.meshes.insert(id, Mesh { name, material });
        Ok(id)
    }

    /// Unregisters a mesh. Its material instance stays in the store.
    pub fn remove_mesh(&mut self, id: MeshId) -> Result<Mesh, SceneError> {
        let mesh = self
            .meshes
            .remove(&id)
            .ok_or(SceneError::MeshNotFound(id))?;
        self.mesh_names.remove(&mesh.name);
        debug!(%id, name = %mesh.name, "mesh removed");
        Ok(mesh)
    }

    /// Looks up a mesh by id.
    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(&id)
    }

    /// Looks up a mesh id by name.
    pub fn mesh_by_name(&self, name: &str) -> Option<MeshId> {
        self.mesh_names.get(name).copied()
    }

    /// All mesh ids in registration order.
    pub fn mesh_ids(&self) -> Vec<MeshId> {
        self.meshes.keys().copied().collect()
    }

    /// Iterates meshes in registration order.
    pub fn meshes(&self) -> impl Iterator<Item = (MeshId, &Mesh)> {
        self.meshes.iter().map(|(&id, mesh)| (id, mesh))
    }

    /// Number of registered meshes.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Material value currently shown by a mesh, if it has one.
    pub fn mesh_material(&self, id: MeshId) -> Option<&MaterialDef> {
        self.mesh(id)?.material.and_then(|h| self.material(h))
    }

    pub(crate) fn check_material(&self, handle: MaterialHandle) -> Result<(), SceneError> {
        if self.materials.contains_key(&handle) {
            Ok(())
        } else {
            Err(SceneError::MaterialNotFound(handle))
        }
    }

    pub(crate) fn mesh_slot(
        &mut self,
        id: MeshId,
    ) -> Result<&mut Option<MaterialHandle>, SceneError> {
        self.meshes
            .get_mut(&id)
            .map(|m| &mut m.material)
            .ok_or(SceneError::MeshNotFound(id))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
