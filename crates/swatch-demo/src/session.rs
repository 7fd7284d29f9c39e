//! One override session: load a scene, capture, apply, optionally restore.

use swatch_config::{Config, OverrideConfig};
use swatch_materials::MaterialLibrary;
use swatch_override::{MaterialOverride, OverrideError};
use swatch_scene::{ManifestError, MaterialHandle, MaterialHost, MeshId, Scene, SceneError};
use thiserror::Error;
use tracing::{info, warn};

/// Scene used when the config names no manifest.
pub const SAMPLE_SCENE: &str = include_str!("../scenes/showroom.ron");

/// Errors that end a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The scene manifest could not be loaded.
    #[error("loading scene: {0}")]
    Manifest(#[from] ManifestError),

    /// The override material is not in the scene's library.
    #[error("material `{0}` is not in the scene library")]
    UnknownMaterial(String),

    /// A configured mesh name is not in the scene.
    #[error("mesh `{0}` is not in the scene")]
    UnknownMesh(String),

    /// The override controller failed.
    #[error(transparent)]
    Override(#[from] OverrideError),

    /// Cleanup after the session failed.
    #[error("cleanup: {0}")]
    Scene(#[from] SceneError),
}

/// Material names per mesh after a session.
#[derive(Debug, PartialEq)]
pub struct Summary {
    /// Number of meshes the override was applied to.
    pub overridden: usize,
    /// Whether the originals were put back.
    pub restored: bool,
    /// `(mesh, material name)` for every mesh in the scene, in registration order.
    pub materials: Vec<(String, Option<String>)>,
}

/// Runs a session as described by `config`.
pub fn run(config: &Config) -> Result<Summary, SessionError> {
    let (mut scene, library) = match &config.scene.manifest {
        Some(path) => Scene::from_manifest(path)?,
        None => Scene::from_manifest_str(SAMPLE_SCENE)?,
    };
    run_on(&mut scene, &library, config)
}

/// Runs a session against an already loaded scene.
pub fn run_on(
    scene: &mut Scene,
    library: &MaterialLibrary,
    config: &Config,
) -> Result<Summary, SessionError> {
    let settings = &config.overrides;
    let def = library
        .get(&settings.material)
        .ok_or_else(|| SessionError::UnknownMaterial(settings.material.clone()))?;
    let meshes = select_meshes(scene, &settings.meshes)?;

    let template = scene.add_material(def.clone());
    let overridden = run_override(scene, meshes, template, settings)?;

    Ok(Summary {
        overridden,
        restored: settings.restore,
        materials: material_names(scene),
    })
}

/// Captures `meshes`, applies `template` and optionally restores. The snapshot
/// and `template` are released whether or not the steps succeed.
fn run_override(
    scene: &mut Scene,
    meshes: Vec<MeshId>,
    template: MaterialHandle,
    settings: &OverrideConfig,
) -> Result<usize, SessionError> {
    let mut controller = match MaterialOverride::capture(scene, meshes) {
        Ok(controller) => controller,
        Err(e) => {
            release_template(scene, template);
            return Err(e.into());
        }
    };
    report(scene, "captured");

    let outcome = drive(scene, &mut controller, template, settings);
    let overridden = controller.len();
    controller.release(scene);

    match outcome {
        Ok(()) => {
            scene.release_material(template)?;
            Ok(overridden)
        }
        Err(e) => {
            release_template(scene, template);
            Err(e.into())
        }
    }
}

fn drive(
    scene: &mut Scene,
    controller: &mut MaterialOverride,
    template: MaterialHandle,
    settings: &OverrideConfig,
) -> Result<(), OverrideError> {
    controller.apply(scene, template)?;
    info!(material = %settings.material, meshes = controller.len(), "override applied");
    report(scene, "applied");

    if settings.restore {
        controller.restore(scene)?;
        verify_restored(scene, controller);
        report(scene, "restored");
    }
    Ok(())
}

/// Cleanup on a failure path: the original error wins over a release error.
fn release_template(scene: &mut Scene, template: MaterialHandle) {
    if let Err(error) = scene.release_material(template) {
        warn!(material = %template, %error, "override template not released");
    }
}

/// Resolves mesh names, or every mesh when `names` is empty.
fn select_meshes(scene: &Scene, names: &[String]) -> Result<Vec<MeshId>, SessionError> {
    if names.is_empty() {
        return Ok(scene.mesh_ids());
    }
    names
        .iter()
        .map(|name| {
            scene
                .mesh_by_name(name)
                .ok_or_else(|| SessionError::UnknownMesh(name.clone()))
        })
        .collect()
}

fn material_names(scene: &Scene) -> Vec<(String, Option<String>)> {
    scene
        .meshes()
        .map(|(id, mesh)| {
            let material = scene.mesh_material(id).map(|m| m.name.clone());
            (mesh.name().to_string(), material)
        })
        .collect()
}

fn report(scene: &Scene, stage: &str) {
    for (mesh, material) in material_names(scene) {
        info!(
            stage,
            %mesh,
            material = material.as_deref().unwrap_or("<none>"),
            "mesh material"
        );
    }
}

fn verify_restored(scene: &Scene, controller: &MaterialOverride) {
    for &mesh in controller.meshes() {
        let expected = controller.original(mesh).and_then(|h| scene.material(h));
        if scene.mesh_material(mesh) != expected {
            warn!(%mesh, "material differs from captured original after restore");
        }
    }
}
