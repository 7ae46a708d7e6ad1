//! 3D Mathematics Library
//!
//! This crate provides the small set of math types shared by the RigidScene
//! crates.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Quat`] - Rotation quaternion stored as (x, y, z, w)
//! - [`Mat4`] - 4x4 matrix for object transforms (row-vector convention)

mod vec3;
mod quat;
pub mod mat4;

pub use vec3::Vec3;
pub use quat::Quat;
pub use mat4::Mat4;
