//! RigidScene - headless simulation runner
//!
//! Loads a scene manifest, simulates it for a fixed number of frames and
//! reports where every object ended up.

use std::path::Path;
use std::process::ExitCode;

use rigidscene::app::{AppContext, AppError};
use rigidscene::config::AppConfig;
use rigidscene::logging::init_logging;
use rigidscene::scene::SceneBuilder;
use rigidscene::systems::SimulationSystem;
use rigidscene_core::SceneManifest;

fn run(config: &AppConfig) -> Result<(), AppError> {
    let physics_config = config.physics.to_physics_config();
    let scene_path = Path::new(&config.scene.path);

    let mut ctx = match SceneManifest::load(scene_path) {
        Ok(manifest) => {
            let base_dir = scene_path.parent().unwrap_or_else(|| Path::new("."));
            AppContext::from_manifest(&manifest, base_dir, physics_config)?
        }
        Err(e) => {
            log::warn!(
                "Failed to load scene '{}': {}. Using the fallback scene.",
                config.scene.path,
                e
            );
            AppContext::from_manifest(&SceneBuilder::fallback().build(), Path::new("."), physics_config)?
        }
    };

    let mut system = SimulationSystem::new();
    let frames = config.simulation.frames;
    for _ in 0..frames {
        let result = system.run_frame(&mut ctx, config.simulation.frame_dt);
        if result.frame > 0 && result.frame % 60 == 0 {
            log::info!("Frame {} (t = {:.2}s)", result.frame, result.elapsed);
        }
    }
    log::info!("Simulated {} frames", system.frames_run());

    for named in ctx.objects() {
        let object = named.object.borrow();
        log::info!(
            "{}: translation {:?}, rotation {:?}",
            named.name,
            object.translation().to_array(),
            object.rotation().to_array()
        );
    }

    if let Some(dir) = &config.scene.save_dir {
        let saved = ctx.save_objects(Path::new(dir))?;
        log::info!("Saved {} objects to {}", saved, dir);
    }
    Ok(())
}

fn main() -> ExitCode {
    let config = AppConfig::load();
    let log_level = config
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_logging(&log_level);
    log::info!("Starting RigidScene");

    let config = config.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
