//! Application systems
//!
//! Per-frame logic kept out of main.rs so it can be tested on its own.

mod simulation;

pub use simulation::{FrameResult, SimulationSystem};
