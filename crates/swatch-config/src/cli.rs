//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Apply a material override to a scene and restore it.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "swatch", about = "Temporarily swap mesh materials and restore them")]
pub struct CliArgs {
    /// RON scene manifest to load.
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Library material to apply.
    #[arg(long)]
    pub material: Option<String>,

    /// Comma-separated mesh names to override (default: all meshes).
    #[arg(long, value_delimiter = ',')]
    pub meshes: Option<Vec<String>>,

    /// Leave the override in place instead of restoring.
    #[arg(long)]
    pub keep: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref path) = args.scene {
            self.scene.manifest = Some(path.clone());
        }
        if let Some(ref material) = args.material {
            self.overrides.material = material.clone();
        }
        if let Some(ref meshes) = args.meshes {
            self.overrides.meshes = meshes.clone();
        }
        if args.keep {
            self.overrides.restore = false;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs::parse_from([
            "swatch",
            "--material",
            "xray",
            "--meshes",
            "crate,barrel",
            "--keep",
        ]);
        config.apply_cli_overrides(&args);
        assert_eq!(config.overrides.material, "xray");
        assert_eq!(config.overrides.meshes, ["crate", "barrel"]);
        assert!(!config.overrides.restore);
        // Non-overridden fields retain defaults
        assert_eq!(config.debug.log_level, "info");
        assert_eq!(config.scene.manifest, None);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_scene_and_config_paths() {
        let args = CliArgs::parse_from([
            "swatch",
            "--scene",
            "showroom.ron",
            "--config",
            "/tmp/swatch",
            "--log-level",
            "debug",
        ]);
        let mut config = Config::default();
        config.apply_cli_overrides(&args);
        assert_eq!(config.scene.manifest, Some(PathBuf::from("showroom.ron")));
        assert_eq!(config.debug.log_level, "debug");
        assert_eq!(args.config, Some(PathBuf::from("/tmp/swatch")));
    }
}
