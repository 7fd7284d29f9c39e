//! Demo binary that swaps every mesh of a scene to one material and restores the originals.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p swatch-demo` to use the built-in sample scene.
//! Run with `cargo run -p swatch-demo -- --material xray --meshes wrench,toolbox --keep`
//! to leave a partial override in place.

mod session;

use std::process::ExitCode;

use clap::Parser;
use swatch_config::{CliArgs, Config, default_config_dir};
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = match args.config.clone().map_or_else(default_config_dir, Ok) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    if let Err(e) = swatch_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config))
    {
        eprintln!("Failed to initialize logging: {e}");
    }

    match session::run(&config) {
        Ok(summary) => {
            info!(
                meshes = summary.overridden,
                restored = summary.restored,
                "session finished"
            );
            for (mesh, material) in &summary.materials {
                println!("{mesh}: {}", material.as_deref().unwrap_or("<none>"));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "session failed");
            ExitCode::FAILURE
        }
    }
}
