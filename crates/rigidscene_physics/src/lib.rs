//! Physics binding for RigidScene
//!
//! This crate connects scene objects to a `rapier3d` simulation:
//! - Collision shapes built from mesh geometry (static triangle meshes, dynamic convex hulls)
//! - Object registration with a mass-based static/dynamic policy
//! - Fixed-step updates that write simulated transforms back onto the objects

mod convert;
pub mod error;
pub mod motion_state;
pub mod shape;
pub mod world;

// Re-export commonly used types
pub use error::RegisterError;
pub use motion_state::MotionState;
pub use shape::{CollisionShape, ShapeKind};
pub use world::{PhysicsConfig, PhysicsWorld, Registration, RegistrationKey};
