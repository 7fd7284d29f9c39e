//! Material library: named [`MaterialDef`] lookup loaded from a RON manifest.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::material::{MaterialDef, MaterialError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned while building a [`MaterialLibrary`].
#[derive(Debug, Error)]
pub enum LibraryError {
    /// I/O error reading the manifest file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// RON deserialization error.
    #[error("ron parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// Material validation error.
    #[error("material error: {0}")]
    Material(#[from] MaterialError),

    /// Duplicate material name.
    #[error("duplicate material name: {0}")]
    DuplicateName(String),
}

// ---------------------------------------------------------------------------
// RON manifest types
// ---------------------------------------------------------------------------

/// Top-level RON manifest for a material library.
#[derive(Debug, Deserialize)]
pub struct MaterialManifest {
    /// Material entries.
    pub materials: Vec<MaterialEntry>,
}

/// A single material entry in the RON manifest.
///
/// Omitted fields take the [`MaterialDef::default`] value.
#[derive(Clone, Debug, Deserialize)]
pub struct MaterialEntry {
    /// Human-readable name.
    pub name: String,
    /// Base color RGBA.
    #[serde(default)]
    pub albedo: Option<(f32, f32, f32, f32)>,
    /// Metallic factor.
    #[serde(default)]
    pub metallic: Option<f32>,
    /// Roughness factor.
    #[serde(default)]
    pub roughness: Option<f32>,
    /// Emissive color RGB.
    #[serde(default)]
    pub emissive_color: Option<(f32, f32, f32)>,
    /// Emissive intensity multiplier.
    #[serde(default)]
    pub emissive_intensity: Option<f32>,
    /// Opacity.
    #[serde(default)]
    pub opacity: Option<f32>,
}

impl MaterialEntry {
    /// Converts the entry into a validated [`MaterialDef`].
    pub fn into_def(self) -> Result<MaterialDef, MaterialError> {
        let base = MaterialDef::default();
        MaterialDef {
            name: self.name,
            albedo: self
                .albedo
                .map(|(r, g, b, a)| [r, g, b, a])
                .unwrap_or(base.albedo),
            metallic: self.metallic.unwrap_or(base.metallic),
            roughness: self.roughness.unwrap_or(base.roughness),
            emissive_color: self
                .emissive_color
                .map(|(r, g, b)| [r, g, b])
                .unwrap_or(base.emissive_color),
            emissive_intensity: self.emissive_intensity.unwrap_or(base.emissive_intensity),
            opacity: self.opacity.unwrap_or(base.opacity),
        }
        .validated()
    }
}

// ---------------------------------------------------------------------------
// MaterialLibrary
// ---------------------------------------------------------------------------

/// Named material definitions, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct MaterialLibrary {
    materials: Vec<MaterialDef>,
    name_to_index: HashMap<String, usize>,
}

impl MaterialLibrary {
    /// Creates an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the library from a RON manifest file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError`] on I/O, parse, or validation failures.
    pub fn from_ron(path: &Path) -> Result<Self, LibraryError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load the library from a RON string.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError`] on parse or validation failures.
    pub fn from_ron_str(ron_str: &str) -> Result<Self, LibraryError> {
        let manifest: MaterialManifest = ron::from_str(ron_str)?;
        Self::from_entries(manifest.materials)
    }

    /// Builds a library from already-parsed manifest entries.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::DuplicateName`] if two entries share a name, or
    /// [`LibraryError::Material`] if an entry fails validation.
    pub fn from_entries(
        entries: impl IntoIterator<Item = MaterialEntry>,
    ) -> Result<Self, LibraryError> {
        let mut library = Self::new();
        for entry in entries {
            library.insert(entry.into_def()?)?;
        }
        Ok(library)
    }

    /// Adds a definition under its own name.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::DuplicateName`] if the name is already taken.
    pub fn insert(&mut self, def: MaterialDef) -> Result<(), LibraryError> {
        let def = def.validated()?;
        if self.name_to_index.contains_key(&def.name) {
            return Err(LibraryError::DuplicateName(def.name));
        }
        self.name_to_index
            .insert(def.name.clone(), self.materials.len());
        self.materials.push(def);
        Ok(())
    }

    /// Look up a material by name.
    pub fn get(&self, name: &str) -> Option<&MaterialDef> {
        self.name_to_index.get(name).map(|&i| &self.materials[i])
    }

    /// Material names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.iter().map(|m| m.name.as_str())
    }

    /// All definitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &MaterialDef> {
        self.materials.iter()
    }

    /// Number of materials.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Returns `true` if the library holds no materials.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ron() -> &'static str {
        r#"MaterialManifest(
            materials: [
                (
                    name: "red",
                    albedo: Some((1.0, 0.0, 0.0, 1.0)),
                    roughness: Some(0.4),
                ),
                (
                    name: "highlight",
                    albedo: Some((1.0, 1.0, 0.0, 1.0)),
                    emissive_color: Some((1.0, 1.0, 0.0)),
                    emissive_intensity: Some(2.0),
                ),
            ],
        )"#
    }

    #[test]
    fn test_library_loads_from_ron() {
        let library = MaterialLibrary::from_ron_str(sample_ron()).unwrap();
        assert_eq!(library.len(), 2);
        assert_eq!(library.names().collect::<Vec<_>>(), ["red", "highlight"]);
    }

    #[test]
    fn test_omitted_fields_take_defaults() {
        let library = MaterialLibrary::from_ron_str(sample_ron()).unwrap();
        let red = library.get("red").unwrap();
        assert_eq!(red.albedo, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(red.roughness, 0.4);
        assert_eq!(red.metallic, MaterialDef::default().metallic);
        assert!(library.get("highlight").unwrap().is_emissive());
    }

    #[test]
    fn test_lookup_missing_name() {
        let library = MaterialLibrary::from_ron_str(sample_ron()).unwrap();
        assert!(library.get("nonexistent").is_none());
    }

    #[test]
    fn test_values_are_clamped_on_load() {
        let ron = r#"MaterialManifest(materials: [(name: "hot", opacity: Some(4.0))])"#;
        let library = MaterialLibrary::from_ron_str(ron).unwrap();
        assert_eq!(library.get("hot").unwrap().opacity, 1.0);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let ron = r#"MaterialManifest(materials: [(name: "red"), (name: "red")])"#;
        let result = MaterialLibrary::from_ron_str(ron);
        assert!(matches!(result, Err(LibraryError::DuplicateName(ref n)) if n == "red"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let ron = r#"MaterialManifest(materials: [(name: "")])"#;
        let result = MaterialLibrary::from_ron_str(ron);
        assert!(matches!(
            result,
            Err(LibraryError::Material(MaterialError::EmptyName))
        ));
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result = MaterialLibrary::from_ron_str("{{not valid}}");
        assert!(matches!(result, Err(LibraryError::Ron(_))));
    }

    #[test]
    fn test_from_ron_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("materials.ron");
        std::fs::write(&path, sample_ron()).unwrap();

        let library = MaterialLibrary::from_ron(&path).unwrap();
        assert_eq!(library.len(), 2);

        let missing = MaterialLibrary::from_ron(&dir.path().join("missing.ron"));
        assert!(matches!(missing, Err(LibraryError::Io(_))));
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut library = MaterialLibrary::new();
        assert!(library.is_empty());
        library.insert(MaterialDef::solid("blue", [0.0, 0.0, 1.0])).unwrap();
        let again = library.insert(MaterialDef::solid("blue", [0.0, 0.0, 0.5]));
        assert!(matches!(again, Err(LibraryError::DuplicateName(_))));
        assert_eq!(library.get("blue").unwrap().albedo[2], 1.0);
    }
}
