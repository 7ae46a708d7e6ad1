//! Scene manifests
//!
//! A [`SceneManifest`] is a RON file listing the objects of a scene. Each
//! [`ObjectTemplate`] names a geometry source, optional transform overrides and
//! an optional physics mass.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use rigidscene_math::{Quat, Vec3};

use crate::{Mesh, PersistError, SceneObject};

/// Where an object's geometry comes from
///
/// Primitive variants are built in local space; the object transform places
/// them in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeometrySource {
    /// No geometry (the object cannot be registered with physics)
    None,
    /// The single right triangle of [`Mesh::triangle`]
    Triangle,
    /// An axis-aligned box
    Cuboid {
        half_extents: Vec3,
    },
    /// A square ground plane facing +Y
    Plane {
        half_size: f32,
    },
    /// An object file in the binary object format
    ///
    /// Relative paths are resolved against the manifest's directory. The
    /// file's own transform is used unless the template overrides it.
    File {
        path: String,
    },
}

/// Serializable description of one scene object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectTemplate {
    /// Name used in logs and for saved object files
    pub name: String,
    pub geometry: GeometrySource,
    #[serde(default)]
    pub translation: Option<Vec3>,
    #[serde(default)]
    pub rotation: Option<Quat>,
    #[serde(default)]
    pub scale: Option<Vec3>,
    /// Physics mass; absent means the object is not simulated, zero means static
    #[serde(default)]
    pub mass: Option<f32>,
}

impl ObjectTemplate {
    /// Create a template with no transform overrides and no physics
    pub fn new(name: impl Into<String>, geometry: GeometrySource) -> Self {
        Self {
            name: name.into(),
            geometry,
            translation: None,
            rotation: None,
            scale: None,
            mass: None,
        }
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = Some(translation);
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }

    /// Build the scene object described by this template
    ///
    /// `base_dir` resolves relative [`GeometrySource::File`] paths. The
    /// returned object has an up-to-date transform.
    pub fn instantiate(&self, base_dir: &Path) -> Result<SceneObject, SceneLoadError> {
        let mut object = match &self.geometry {
            GeometrySource::None => SceneObject::new(),
            GeometrySource::Triangle => SceneObject::new().with_mesh(Arc::new(Mesh::triangle())),
            GeometrySource::Cuboid { half_extents } => {
                SceneObject::new().with_mesh(Arc::new(Mesh::cuboid(*half_extents)))
            }
            GeometrySource::Plane { half_size } => {
                SceneObject::new().with_mesh(Arc::new(Mesh::plane(*half_size)))
            }
            GeometrySource::File { path } => SceneObject::load_from_file(base_dir.join(path))
                .map_err(|source| SceneLoadError::Object {
                    name: self.name.clone(),
                    source,
                })?,
        };

        if let Some(translation) = self.translation {
            object.set_translation(translation);
        }
        if let Some(rotation) = self.rotation {
            object.set_rotation(rotation);
        }
        if let Some(scale) = self.scale {
            object.set_scale(scale);
        }
        object.recompute_transform();
        Ok(object)
    }
}

/// A serializable list of object templates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneManifest {
    /// Scene name (for display/debugging)
    pub name: String,
    pub objects: Vec<ObjectTemplate>,
}

impl SceneManifest {
    /// Create a new empty manifest
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: Vec::new(),
        }
    }

    /// Load a manifest from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneLoadError> {
        let contents = fs::read_to_string(path)?;
        let manifest = ron::from_str(&contents)?;
        Ok(manifest)
    }

    /// Save a manifest to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneSaveError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn add_object(&mut self, object: ObjectTemplate) {
        self.objects.push(object);
    }
}

/// Error loading a scene
#[derive(Debug)]
pub enum SceneLoadError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
    /// An object's geometry file could not be loaded
    Object { name: String, source: PersistError },
}

impl From<io::Error> for SceneLoadError {
    fn from(e: io::Error) -> Self {
        SceneLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SceneLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneLoadError::Parse(e)
    }
}

impl std::fmt::Display for SceneLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneLoadError::Io(e) => write!(f, "IO error: {}", e),
            SceneLoadError::Parse(e) => write!(f, "Parse error: {}", e),
            SceneLoadError::Object { name, source } => {
                write!(f, "Failed to load object '{}': {}", name, source)
            }
        }
    }
}

impl std::error::Error for SceneLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneLoadError::Object { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Error saving a scene
#[derive(Debug)]
pub enum SceneSaveError {
    /// IO error (permission denied, disk full, etc.)
    Io(io::Error),
    /// Serialization error
    Serialize(ron::Error),
}

impl From<io::Error> for SceneSaveError {
    fn from(e: io::Error) -> Self {
        SceneSaveError::Io(e)
    }
}

impl From<ron::Error> for SceneSaveError {
    fn from(e: ron::Error) -> Self {
        SceneSaveError::Serialize(e)
    }
}

impl std::fmt::Display for SceneSaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneSaveError::Io(e) => write!(f, "IO error: {}", e),
            SceneSaveError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for SceneSaveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_serialization() {
        let mut manifest = SceneManifest::new("Drop Test");
        manifest.add_object(
            ObjectTemplate::new("ground", GeometrySource::Plane { half_size: 10.0 }).with_mass(0.0),
        );
        manifest.add_object(
            ObjectTemplate::new("crate", GeometrySource::Cuboid { half_extents: Vec3::splat(0.5) })
                .with_translation(Vec3::new(0.0, 5.0, 0.0))
                .with_mass(1.0),
        );

        let pretty = ron::ser::PrettyConfig::new().struct_names(true);
        let serialized = ron::ser::to_string_pretty(&manifest, pretty).unwrap();
        assert!(serialized.contains("Drop Test"));
        assert!(serialized.contains("Cuboid"));

        let deserialized: SceneManifest = ron::from_str(&serialized).unwrap();
        assert_eq!(deserialized, manifest);
    }

    #[test]
    fn test_parse_manifest_file_format() {
        let manifest_ron = r#"
SceneManifest(
    name: "Parsed",
    objects: [
        ObjectTemplate(
            name: "floor",
            geometry: GeometrySource(type: "Plane", half_size: 20.0),
            mass: Some(0.0),
        ),
        ObjectTemplate(
            name: "tri",
            geometry: GeometrySource(type: "Triangle"),
            translation: Some(Vec3(x: 0.0, y: 30.0, z: 0.0)),
            scale: Some(Vec3(x: 0.2, y: 0.2, z: 0.2)),
        ),
        ObjectTemplate(
            name: "marker",
            geometry: GeometrySource(type: "None"),
        ),
    ],
)
"#;
        let manifest: SceneManifest = ron::from_str(manifest_ron).unwrap();
        assert_eq!(manifest.objects.len(), 3);
        assert_eq!(manifest.objects[0].geometry, GeometrySource::Plane { half_size: 20.0 });
        assert_eq!(manifest.objects[0].mass, Some(0.0));
        assert_eq!(manifest.objects[1].translation, Some(Vec3::new(0.0, 30.0, 0.0)));
        assert_eq!(manifest.objects[1].mass, None);
        assert_eq!(manifest.objects[2].geometry, GeometrySource::None);
    }

    #[test]
    fn test_instantiate_applies_overrides() {
        let template = ObjectTemplate::new("tri", GeometrySource::Triangle)
            .with_translation(Vec3::new(0.0, 30.0, 0.0))
            .with_scale(Vec3::splat(0.2));
        let object = template.instantiate(Path::new(".")).unwrap();

        assert!(object.has_mesh());
        assert_eq!(object.scale(), Vec3::splat(0.2));
        assert!(!object.is_transform_stale());
        assert_eq!(object.transform()[3], [0.0, 30.0, 0.0, 1.0]);
    }

    #[test]
    fn test_instantiate_missing_file() {
        let template = ObjectTemplate::new(
            "ghost",
            GeometrySource::File { path: "nope.rso".to_string() },
        );
        let err = template.instantiate(Path::new("does/not/exist")).unwrap_err();
        match err {
            SceneLoadError::Object { name, source: PersistError::NotFound(_) } => {
                assert_eq!(name, "ghost");
            }
            other => panic!("Expected missing object file, got {:?}", other),
        }
    }

    #[test]
    fn test_load_invalid_ron() {
        let path = std::env::temp_dir().join("rigidscene_invalid_manifest.ron");
        fs::write(&path, "SceneManifest(name: ").unwrap();
        let result = SceneManifest::load(&path);
        assert!(matches!(result, Err(SceneLoadError::Parse(_))));
        let _ = fs::remove_file(&path);
    }
}
