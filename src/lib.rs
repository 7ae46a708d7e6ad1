//! RigidScene - a small 3D scene runtime with rigid-body physics
//!
//! The library side of the `rigidscene` binary: configuration, logging setup,
//! the application context, scene construction and the frame systems.

pub mod app;
pub mod config;
pub mod logging;
pub mod scene;
pub mod systems;

pub use app::{AppContext, AppError, NamedObject};
