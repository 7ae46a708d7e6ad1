//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`RSC_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

use rigidscene_math::Vec3;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Physics configuration
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Headless frame loop configuration
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Scene configuration
    #[serde(default)]
    pub scene: SceneConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`RSC_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // RSC_SIMULATION__FRAMES=10 -> simulation.frames = 10
        figment = figment.merge(Env::prefixed("RSC_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Physics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity acceleration [x, y, z]
    pub gravity: [f32; 3],
    /// Simulation step length in seconds
    pub fixed_timestep: f32,
    /// Maximum simulation steps per frame
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -1.0, 0.0],
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 1,
        }
    }
}

impl PhysicsConfig {
    /// Convert to the physics crate's configuration
    pub fn to_physics_config(&self) -> rigidscene_physics::PhysicsConfig {
        rigidscene_physics::PhysicsConfig {
            gravity: Vec3::from(self.gravity),
            fixed_timestep: self.fixed_timestep,
            max_substeps: self.max_substeps,
        }
    }
}

/// Headless frame loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Time passed to each physics update, in seconds
    pub frame_dt: f32,
    /// Number of frames to run before exiting
    pub frames: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frame_dt: 1.0 / 60.0,
            frames: 600,
        }
    }
}

/// Scene configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Path to the scene manifest (RON)
    pub path: String,
    /// Directory for saving final object states; nothing is saved when unset
    pub save_dir: Option<String>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            path: "assets/scenes/demo.ron".to_string(),
            save_dir: None,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
