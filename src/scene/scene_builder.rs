//! SceneBuilder - Declarative scene construction
//!
//! Provides a fluent API for building scene manifests in code.

use rigidscene_core::{GeometrySource, ObjectTemplate, SceneManifest, Vec3};

/// Builder for constructing scene manifests
///
/// # Example
/// ```ignore
/// let manifest = SceneBuilder::new("drop test")
///     .add_ground(0.0, 10.0)
///     .add_box("crate", Vec3::new(0.0, 5.0, 0.0), Vec3::splat(0.5), 1.0)
///     .build();
/// ```
pub struct SceneBuilder {
    manifest: SceneManifest,
}

impl SceneBuilder {
    /// Create a new scene builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            manifest: SceneManifest::new(name),
        }
    }

    /// The scene used when no manifest can be loaded: a ground plane and a
    /// falling box
    pub fn fallback() -> Self {
        Self::new("fallback")
            .add_ground(0.0, 20.0)
            .add_box("box", Vec3::new(0.0, 5.0, 0.0), Vec3::splat(0.5), 1.0)
    }

    /// Add a static ground plane at the given Y position
    pub fn add_ground(mut self, y: f32, half_size: f32) -> Self {
        self.manifest.add_object(
            ObjectTemplate::new("ground", GeometrySource::Plane { half_size })
                .with_translation(Vec3::new(0.0, y, 0.0))
                .with_mass(0.0),
        );
        self
    }

    /// Add a box; a mass of zero makes it static
    pub fn add_box(mut self, name: &str, position: Vec3, half_extents: Vec3, mass: f32) -> Self {
        self.manifest.add_object(
            ObjectTemplate::new(name, GeometrySource::Cuboid { half_extents })
                .with_translation(position)
                .with_mass(mass),
        );
        self
    }

    /// Add an arbitrary object template
    pub fn add_object(mut self, template: ObjectTemplate) -> Self {
        self.manifest.add_object(template);
        self
    }

    /// Build the manifest
    pub fn build(self) -> SceneManifest {
        self.manifest
    }
}
