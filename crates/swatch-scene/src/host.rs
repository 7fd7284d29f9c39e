//! [`MaterialHost`]: the material slot and cloning capability a scene exposes.

use tracing::debug;

use crate::scene::{MaterialHandle, MeshId, Scene, SceneError};

/// Access to mesh material slots and material-instance cloning.
///
/// Implemented by [`Scene`]; other engines implement it to host overrides
/// without going through a global scene.
pub trait MaterialHost {
    /// Material instance currently assigned to `mesh`.
    fn material_of(&self, mesh: MeshId) -> Result<Option<MaterialHandle>, SceneError>;

    /// Assigns `material` to `mesh` (or clears the slot) and returns the previous
    /// assignment.
    fn set_material(
        &mut self,
        mesh: MeshId,
        material: Option<MaterialHandle>,
    ) -> Result<Option<MaterialHandle>, SceneError>;

    /// Creates a new instance holding a deep copy of `material`.
    fn clone_material(&mut self, material: MaterialHandle) -> Result<MaterialHandle, SceneError>;

    /// Drops a material instance that no mesh uses any more.
    fn release_material(&mut self, material: MaterialHandle) -> Result<(), SceneError>;
}

impl MaterialHost for Scene {
    fn material_of(&self, mesh: MeshId) -> Result<Option<MaterialHandle>, SceneError> {
        self.mesh(mesh)
            .map(|m| m.material())
            .ok_or(SceneError::MeshNotFound(mesh))
    }

    fn set_material(
        &mut self,
        mesh: MeshId,
        material: Option<MaterialHandle>,
    ) -> Result<Option<MaterialHandle>, SceneError> {
        if let Some(handle) = material {
            self.check_material(handle)?;
        }
        let slot = self.mesh_slot(mesh)?;
        Ok(std::mem::replace(slot, material))
    }

    fn clone_material(&mut self, material: MaterialHandle) -> Result<MaterialHandle, SceneError> {
        let def = self
            .material(material)
            .cloned()
            .ok_or(SceneError::MaterialNotFound(material))?;
        let copy = self.add_material(def);
        debug!(source = %material, %copy, "material cloned");
        Ok(copy)
    }

    fn release_material(&mut self, material: MaterialHandle) -> Result<(), SceneError> {
        self.remove_material(material).map(drop)
    }
}
