//! Simulation system
//!
//! Drives the physics world one frame at a time. Every registered object's
//! transform is up to date when a frame returns.

use crate::app::AppContext;

/// Result of a simulation frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameResult {
    /// Index of the frame just run, starting at 0
    pub frame: u64,
    /// Total time passed to the physics world so far
    pub elapsed: f32,
}

/// Runs simulation frames against an [`AppContext`]
pub struct SimulationSystem {
    frame: u64,
    elapsed: f32,
}

impl SimulationSystem {
    /// Create a new simulation system
    pub fn new() -> Self {
        Self {
            frame: 0,
            elapsed: 0.0,
        }
    }

    /// Run one simulation frame of `dt` seconds
    pub fn run_frame(&mut self, ctx: &mut AppContext, dt: f32) -> FrameResult {
        ctx.physics_mut().update(dt);

        let result = FrameResult {
            frame: self.frame,
            elapsed: self.elapsed + dt.max(0.0),
        };
        self.frame += 1;
        self.elapsed = result.elapsed;
        log::trace!("Frame {} done at t = {:.3}", result.frame, result.elapsed);
        result
    }

    /// Number of frames run so far
    pub fn frames_run(&self) -> u64 {
        self.frame
    }
}

impl Default for SimulationSystem {
    fn default() -> Self {
        Self::new()
    }
}
