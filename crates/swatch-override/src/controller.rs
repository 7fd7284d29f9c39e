//! [`MaterialOverride`]: capture, apply and restore of mesh materials.

use rustc_hash::FxHashMap;
use swatch_scene::{MaterialHandle, MaterialHost, MeshId, SceneError};
use thiserror::Error;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A host failure, tagged with the operation and the mesh being processed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OverrideError {
    /// Reading or cloning a mesh's material during capture failed.
    #[error("capture failed at {mesh}: {source}")]
    Capture {
        /// Mesh being captured.
        mesh: MeshId,
        /// Host error.
        #[source]
        source: SceneError,
    },

    /// Cloning the template or assigning the clone failed.
    #[error("apply failed at {mesh}: {source}")]
    Apply {
        /// Mesh being overridden.
        mesh: MeshId,
        /// Host error.
        #[source]
        source: SceneError,
    },

    /// Cloning the captured material or assigning it failed.
    #[error("restore failed at {mesh}: {source}")]
    Restore {
        /// Mesh being restored.
        mesh: MeshId,
        /// Host error.
        #[source]
        source: SceneError,
    },
}

impl OverrideError {
    /// Mesh that was being processed when the host failed.
    pub fn mesh(&self) -> MeshId {
        match self {
            Self::Capture { mesh, .. } | Self::Apply { mesh, .. } | Self::Restore { mesh, .. } => {
                *mesh
            }
        }
    }

    /// Underlying host error.
    pub fn scene_error(&self) -> &SceneError {
        match self {
            Self::Capture { source, .. }
            | Self::Apply { source, .. }
            | Self::Restore { source, .. } => source,
        }
    }
}

// ---------------------------------------------------------------------------
// OverrideState
// ---------------------------------------------------------------------------

/// Most recent operation performed by a [`MaterialOverride`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverrideState {
    /// Snapshot taken, nothing changed yet.
    Captured,
    /// Every mesh shows a clone of the override template.
    Applied,
    /// Every mesh shows a clone of its captured material.
    Restored,
}

// ---------------------------------------------------------------------------
// MaterialOverride
// ---------------------------------------------------------------------------

/// Swaps the materials of a fixed set of meshes and puts the originals back.
///
/// The snapshot is taken once by [`capture`](Self::capture) and never changes:
/// [`restore`](Self::restore) always returns to the captured state, whatever
/// was applied in between. Snapshot entries are private clones, so later edits
/// to a mesh's material do not leak into them.
///
/// The controller holds mesh ids, not meshes. Every call borrows the host
/// mutably for its duration.
#[derive(Debug)]
pub struct MaterialOverride {
    /// Managed meshes, deduplicated, in capture order.
    meshes: Vec<MeshId>,
    /// One entry per managed mesh; `None` means the mesh had no material.
    originals: FxHashMap<MeshId, Option<MaterialHandle>>,
    /// Clones this controller assigned and believes are still on the mesh.
    installed: FxHashMap<MeshId, MaterialHandle>,
    state: OverrideState,
}

impl MaterialOverride {
    /// Snapshots the current material of every mesh in `meshes`.
    ///
    /// Repeated ids are managed once. An empty list is valid and makes every
    /// later call a no-op.
    ///
    /// # Errors
    ///
    /// [`OverrideError::Capture`] if a mesh is unknown to the host or its
    /// material cannot be cloned. Clones made before the failure are released.
    pub fn capture<H>(
        host: &mut H,
        meshes: impl IntoIterator<Item = MeshId>,
    ) -> Result<Self, OverrideError>
    where
        H: MaterialHost + ?Sized,
    {
        let mut managed = Vec::new();
        let mut originals = FxHashMap::default();

        for mesh in meshes {
            if originals.contains_key(&mesh) {
                debug!(%mesh, "mesh listed twice, keeping first entry");
                continue;
            }
            match snapshot(host, mesh) {
                Ok(original) => {
                    originals.insert(mesh, original);
                    managed.push(mesh);
                }
                Err(source) => {
                    release_all(host, originals.values().flatten().copied());
                    return Err(OverrideError::Capture { mesh, source });
                }
            }
        }

        debug!(meshes = managed.len(), "materials captured");
        Ok(Self {
            meshes: managed,
            originals,
            installed: FxHashMap::default(),
            state: OverrideState::Captured,
        })
    }

    /// Gives every managed mesh its own clone of `template`.
    ///
    /// `template` may be a clone this controller installed earlier; it is
    /// then handed over to the caller instead of being released.
    ///
    /// # Errors
    ///
    /// [`OverrideError::Apply`] on the first mesh the host fails on. Meshes
    /// before it keep their new clone.
    pub fn apply<H>(&mut self, host: &mut H, template: MaterialHandle) -> Result<(), OverrideError>
    where
        H: MaterialHost + ?Sized,
    {
        let Self {
            meshes, installed, ..
        } = self;

        for &mesh in meshes.iter() {
            host.clone_material(template)
                .and_then(|copy| {
                    install(host, installed, mesh, Some(copy), Some(template))
                })
                .map_err(|source| OverrideError::Apply { mesh, source })?;
        }

        debug!(%template, meshes = self.meshes.len(), "override applied");
        self.state = OverrideState::Applied;
        Ok(())
    }

    /// Puts a fresh clone of each captured material back on its mesh, and
    /// clears meshes that had none.
    ///
    /// # Errors
    ///
    /// [`OverrideError::Restore`] on the first mesh the host fails on, e.g. a
    /// mesh removed from the scene after capture. Meshes before it are restored.
    pub fn restore<H>(&mut self, host: &mut H) -> Result<(), OverrideError>
    where
        H: MaterialHost + ?Sized,
    {
        let Self {
            meshes,
            originals,
            installed,
            ..
        } = self;

        for &mesh in meshes.iter() {
            let original = originals.get(&mesh).copied().flatten();
            original
                .map(|handle| host.clone_material(handle))
                .transpose()
                .and_then(|copy| install(host, installed, mesh, copy, None))
                .map_err(|source| OverrideError::Restore { mesh, source })?;
        }

        debug!(meshes = self.meshes.len(), "originals restored");
        self.state = OverrideState::Restored;
        Ok(())
    }

    /// Drops the snapshot instances from the host.
    ///
    /// Clones currently assigned to meshes stay with the host.
    pub fn release<H>(self, host: &mut H)
    where
        H: MaterialHost + ?Sized,
    {
        release_all(host, self.originals.into_values().flatten());
    }

    /// Most recent operation.
    pub fn state(&self) -> OverrideState {
        self.state
    }

    /// Managed meshes in capture order.
    pub fn meshes(&self) -> &[MeshId] {
        &self.meshes
    }

    /// Returns `true` if `mesh` was captured by this controller.
    pub fn manages(&self, mesh: MeshId) -> bool {
        self.originals.contains_key(&mesh)
    }

    /// Snapshot instance captured for `mesh`, or `None` if the mesh had no
    /// material or is not managed.
    pub fn original(&self, mesh: MeshId) -> Option<MaterialHandle> {
        self.originals.get(&mesh).copied().flatten()
    }

    /// Number of managed meshes.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Returns `true` if no meshes are managed.
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Private clone of the mesh's current material.
fn snapshot<H>(host: &mut H, mesh: MeshId) -> Result<Option<MaterialHandle>, SceneError>
where
    H: MaterialHost + ?Sized,
{
    host.material_of(mesh)?
        .map(|current| host.clone_material(current))
        .transpose()
}

/// Assigns `new` to `mesh` and releases the clone it replaces, if this
/// controller put it there and it is not `keep`.
fn install<H>(
    host: &mut H,
    installed: &mut FxHashMap<MeshId, MaterialHandle>,
    mesh: MeshId,
    new: Option<MaterialHandle>,
    keep: Option<MaterialHandle>,
) -> Result<(), SceneError>
where
    H: MaterialHost + ?Sized,
{
    let previous = match host.set_material(mesh, new) {
        Ok(previous) => previous,
        Err(error) => {
            release_all(host, new);
            return Err(error);
        }
    };

    let ours = match new {
        Some(handle) => installed.insert(mesh, handle),
        None => installed.remove(&mesh),
    };
    if let Some(ours) = ours
        && previous == Some(ours)
        && keep != Some(ours)
        && let Err(error) = host.release_material(ours)
    {
        warn!(%mesh, material = %ours, %error, "replaced override clone not released");
    }
    Ok(())
}

fn release_all<H>(host: &mut H, handles: impl IntoIterator<Item = MaterialHandle>)
where
    H: MaterialHost + ?Sized,
{
    for handle in handles {
        if let Err(error) = host.release_material(handle) {
            warn!(material = %handle, %error, "material not released");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
