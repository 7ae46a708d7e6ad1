//! Core types for the RigidScene runtime
//!
//! This crate provides the types shared by the loader, the renderer and the
//! physics binding:
//!
//! - [`Vertex`] - Position, normal and texture coordinate of a mesh vertex
//! - [`Mesh`] - Immutable vertex/index buffers (the geometry model)
//! - [`SceneObject`] - Translation, rotation, scale, optional mesh and a derived matrix
//! - [`SharedObject`] - Single-threaded shared handle to a scene object
//! - [`codec`] - The marker-tagged binary object format
//! - [`SceneManifest`] - Loadable/saveable list of object templates

mod vertex;
mod mesh;
mod primitives;
mod scene_object;
mod persist_error;
pub mod codec;
mod scene;

pub use vertex::Vertex;
pub use mesh::{Mesh, MeshError};
pub use scene_object::{DirtyFlags, SceneObject, SharedObject};
pub use persist_error::{CorruptKind, PersistError};
pub use codec::Marker;
pub use scene::{GeometrySource, ObjectTemplate, SceneLoadError, SceneManifest, SceneSaveError};

// Re-export commonly used types from rigidscene_math for convenience
pub use rigidscene_math::{Mat4, Quat, Vec3};
