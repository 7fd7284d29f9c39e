//! Core material value type: [`MaterialDef`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// MaterialError
// ---------------------------------------------------------------------------

/// Errors returned during material validation.
#[derive(Debug, Error, PartialEq)]
pub enum MaterialError {
    /// The material name must not be empty.
    #[error("material name must not be empty")]
    EmptyName,

    /// A numeric field was NaN.
    #[error("material `{name}` has a NaN in `{field}`")]
    NotANumber {
        /// Material name.
        name: String,
        /// Offending field.
        field: &'static str,
    },
}

// ---------------------------------------------------------------------------
// MaterialDef
// ---------------------------------------------------------------------------

/// Surface appearance of a mesh.
///
/// A plain value: cloning it yields an independent copy, and two definitions
/// describe the same appearance iff they compare equal. Ranges are enforced by
/// [`MaterialDef::validated`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDef {
    /// Human-readable name (e.g., "red_plastic", "highlight").
    pub name: String,

    /// Base color in linear RGBA. Each component is clamped to `[0.0, 1.0]`.
    pub albedo: [f32; 4],

    /// Metallic factor: 0.0 = dielectric, 1.0 = pure metal. Clamped to `[0.0, 1.0]`.
    pub metallic: f32,

    /// Roughness factor: 0.0 = mirror-smooth, 1.0 = fully rough. Clamped to `[0.0, 1.0]`.
    pub roughness: f32,

    /// Emissive color in linear RGB. Each component is clamped to `[0.0, 1.0]`.
    pub emissive_color: [f32; 3],

    /// Emissive intensity multiplier. Must be >= 0.0.
    pub emissive_intensity: f32,

    /// Opacity: 1.0 = fully opaque, 0.0 = fully transparent. Clamped to `[0.0, 1.0]`.
    pub opacity: f32,
}

impl Default for MaterialDef {
    fn default() -> Self {
        Self {
            name: String::from("default"),
            albedo: [0.8, 0.8, 0.8, 1.0],
            metallic: 0.0,
            roughness: 0.5,
            emissive_color: [0.0, 0.0, 0.0],
            emissive_intensity: 0.0,
            opacity: 1.0,
        }
    }
}

impl MaterialDef {
    /// Opaque dielectric with the given name and linear RGB color.
    pub fn solid(name: impl Into<String>, rgb: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            albedo: [rgb[0], rgb[1], rgb[2], 1.0],
            ..Default::default()
        }
    }

    /// Validates and clamps all fields to their legal ranges.
    ///
    /// # Errors
    ///
    /// Returns [`MaterialError::EmptyName`] if the name is empty, or
    /// [`MaterialError::NotANumber`] if any numeric field is NaN.
    pub fn validated(mut self) -> Result<Self, MaterialError> {
        if self.name.is_empty() {
            return Err(MaterialError::EmptyName);
        }

        let scalars = [
            ("albedo", self.albedo.iter().any(|c| c.is_nan())),
            ("metallic", self.metallic.is_nan()),
            ("roughness", self.roughness.is_nan()),
            ("emissive_color", self.emissive_color.iter().any(|c| c.is_nan())),
            ("emissive_intensity", self.emissive_intensity.is_nan()),
            ("opacity", self.opacity.is_nan()),
        ];
        if let Some((field, _)) = scalars.iter().find(|(_, nan)| *nan) {
            return Err(MaterialError::NotANumber {
                name: self.name,
                field: *field,
            });
        }

        for c in &mut self.albedo {
            *c = c.clamp(0.0, 1.0);
        }
        for c in &mut self.emissive_color {
            *c = c.clamp(0.0, 1.0);
        }

        self.metallic = self.metallic.clamp(0.0, 1.0);
        self.roughness = self.roughness.clamp(0.0, 1.0);
        self.opacity = self.opacity.clamp(0.0, 1.0);
        self.emissive_intensity = self.emissive_intensity.max(0.0);

        Ok(self)
    }

    /// Returns `true` if this material emits light.
    pub fn is_emissive(&self) -> bool {
        self.emissive_intensity > 0.0 && self.emissive_color.iter().any(|&c| c > 0.0)
    }

    /// Returns `true` if the surface lets any light through.
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0 || self.albedo[3] < 1.0
    }

    /// Total emissive contribution = color × intensity.
    pub fn emissive_output(&self) -> [f32; 3] {
        self.emissive_color.map(|c| c * self.emissive_intensity)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_material_has_reasonable_values() {
        let mat = MaterialDef::default();
        assert_eq!(mat.name, "default");
        assert!(mat.albedo[..3].iter().all(|&c| c > 0.0 && c <= 1.0));
        assert_eq!(mat.albedo[3], 1.0);
        assert_eq!(mat.metallic, 0.0);
        assert!(mat.roughness > 0.0 && mat.roughness < 1.0);
        assert_eq!(mat.opacity, 1.0);
        assert!(!mat.is_transparent());
    }

    #[test]
    fn test_solid_sets_albedo_and_name() {
        let red = MaterialDef::solid("red", [1.0, 0.0, 0.0]);
        assert_eq!(red.name, "red");
        assert_eq!(red.albedo, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(red.roughness, MaterialDef::default().roughness);
    }

    #[test]
    fn test_clone_is_equal_but_independent() {
        let original = MaterialDef::solid("blue", [0.0, 0.0, 1.0]);
        let mut copy = original.clone();
        assert_eq!(copy, original);

        copy.albedo[0] = 0.5;
        assert_ne!(copy, original);
        assert_eq!(original.albedo[0], 0.0);
    }

    #[test]
    fn test_albedo_components_clamped_to_unit_range() {
        let mat = MaterialDef {
            albedo: [1.5, -0.3, 2.0, -1.0],
            ..Default::default()
        }
        .validated()
        .unwrap();

        assert_eq!(mat.albedo, [1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_scalars_clamped() {
        let mat = MaterialDef {
            metallic: 1.5,
            roughness: -0.5,
            opacity: 3.0,
            emissive_intensity: -5.0,
            ..Default::default()
        }
        .validated()
        .unwrap();
        assert_eq!(mat.metallic, 1.0);
        assert_eq!(mat.roughness, 0.0);
        assert_eq!(mat.opacity, 1.0);
        assert_eq!(mat.emissive_intensity, 0.0);

        let hdr = MaterialDef {
            emissive_intensity: 10.0,
            ..Default::default()
        }
        .validated()
        .unwrap();
        assert_eq!(hdr.emissive_intensity, 10.0);
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = MaterialDef {
            name: String::new(),
            ..Default::default()
        }
        .validated();
        assert_eq!(result, Err(MaterialError::EmptyName));
    }

    #[test]
    fn test_nan_rejected() {
        let result = MaterialDef {
            roughness: f32::NAN,
            ..Default::default()
        }
        .validated();
        assert!(matches!(
            result,
            Err(MaterialError::NotANumber {
                field: "roughness",
                ..
            })
        ));
    }

    #[test]
    fn test_is_emissive() {
        assert!(!MaterialDef::default().is_emissive());

        let emissive = MaterialDef {
            emissive_color: [1.0, 0.0, 0.0],
            emissive_intensity: 2.0,
            ..Default::default()
        };
        assert!(emissive.is_emissive());
    }

    #[test]
    fn test_emissive_output() {
        let mat = MaterialDef {
            emissive_color: [1.0, 0.5, 0.0],
            emissive_intensity: 3.0,
            ..Default::default()
        };
        let out = mat.emissive_output();
        assert!((out[0] - 3.0).abs() < 1e-6);
        assert!((out[1] - 1.5).abs() < 1e-6);
        assert!((out[2] - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let mat: MaterialDef = serde_json::from_str(r#"{"name":"glass","opacity":0.2}"#).unwrap();
        assert_eq!(mat.name, "glass");
        assert_eq!(mat.opacity, 0.2);
        assert_eq!(mat.roughness, 0.5);
        assert!(mat.is_transparent());
    }
}
