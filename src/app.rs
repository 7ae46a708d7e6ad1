//! Application context
//!
//! [`AppContext`] owns the physics world and the scene's object list. It is
//! created by the top-level loop and passed to systems explicitly.

use std::fs;
use std::path::Path;

use rigidscene_core::{PersistError, SceneLoadError, SceneManifest, SceneObject, SharedObject};
use rigidscene_physics::{PhysicsConfig, PhysicsWorld, RegisterError, RegistrationKey};

use crate::config::ConfigError;

/// A scene object with its name and physics registration
pub struct NamedObject {
    pub name: String,
    pub object: SharedObject,
    /// Set when the object is simulated
    pub registration: Option<RegistrationKey>,
}

/// Everything one running scene needs
pub struct AppContext {
    objects: Vec<NamedObject>,
    physics: PhysicsWorld,
}

impl AppContext {
    /// Create an empty context
    pub fn new(physics_config: PhysicsConfig) -> Self {
        Self {
            objects: Vec::new(),
            physics: PhysicsWorld::with_config(physics_config),
        }
    }

    /// Build a context from a manifest
    ///
    /// Objects are added in manifest order. Objects with a mass are
    /// registered with physics; any failure aborts the whole build.
    pub fn from_manifest(
        manifest: &SceneManifest,
        base_dir: &Path,
        physics_config: PhysicsConfig,
    ) -> Result<Self, AppError> {
        let mut ctx = Self::new(physics_config);
        for template in &manifest.objects {
            let object = template.instantiate(base_dir)?;
            ctx.add_object(template.name.clone(), object, template.mass)?;
        }
        log::info!(
            "Built scene '{}': {} objects, {} simulated",
            manifest.name,
            ctx.objects.len(),
            ctx.physics.len()
        );
        Ok(ctx)
    }

    /// Add an object, registering it with physics when `mass` is given
    pub fn add_object(
        &mut self,
        name: impl Into<String>,
        object: SceneObject,
        mass: Option<f32>,
    ) -> Result<&NamedObject, AppError> {
        let name = name.into();
        let object = object.into_shared();
        let registration = match mass {
            Some(mass) => Some(self.physics.register_object(&object, mass).map_err(|source| {
                AppError::Register {
                    name: name.clone(),
                    source,
                }
            })?),
            None => None,
        };
        self.objects.push(NamedObject {
            name,
            object,
            registration,
        });
        Ok(&self.objects[self.objects.len() - 1])
    }

    /// Find an object by name
    pub fn object(&self, name: &str) -> Option<&NamedObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn objects(&self) -> &[NamedObject] {
        &self.objects
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    /// Save every object as `<dir>/<name>.rso` in the binary object format
    ///
    /// Every name must be usable as a file name inside `dir`; otherwise
    /// nothing is written. Returns the number of files written.
    pub fn save_objects(&self, dir: &Path) -> Result<usize, AppError> {
        if let Some(named) = self.objects.iter().find(|o| !is_file_stem(&o.name)) {
            return Err(AppError::InvalidName(named.name.clone()));
        }
        fs::create_dir_all(dir).map_err(|e| AppError::Persist {
            name: dir.display().to_string(),
            source: PersistError::Io(e),
        })?;
        for named in &self.objects {
            let path = dir.join(format!("{}.rso", named.name));
            named
                .object
                .borrow()
                .save_to_file(&path)
                .map_err(|source| AppError::Persist {
                    name: named.name.clone(),
                    source,
                })?;
            log::debug!("Saved '{}' to {}", named.name, path.display());
        }
        Ok(self.objects.len())
    }
}

/// Whether `name` stays inside the save directory when used as a file stem
fn is_file_stem(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}

/// Top-level application error
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Scene(SceneLoadError),
    /// An object could not be registered with physics
    Register { name: String, source: RegisterError },
    /// An object could not be saved
    Persist { name: String, source: PersistError },
    /// An object name cannot be used as a file name
    InvalidName(String),
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}

impl From<SceneLoadError> for AppError {
    fn from(e: SceneLoadError) -> Self {
        AppError::Scene(e)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "{}", e),
            AppError::Scene(e) => write!(f, "Scene error: {}", e),
            AppError::Register { name, source } => {
                write!(f, "Failed to register '{}': {}", name, source)
            }
            AppError::Persist { name, source } => write!(f, "Failed to save '{}': {}", name, source),
            AppError::InvalidName(name) => write!(f, "Object name '{}' is not a valid file name", name),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::Scene(e) => Some(e),
            AppError::Register { source, .. } => Some(source),
            AppError::Persist { source, .. } => Some(source),
            AppError::InvalidName(_) => None,
        }
    }
}
