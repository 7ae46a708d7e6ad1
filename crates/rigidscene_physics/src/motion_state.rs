//! Cached body transforms

use rapier3d::prelude::{Isometry, Real};
use rigidscene_math::{Quat, Vec3};

use crate::convert;

/// World transform of a body as last read from the simulation
///
/// Created from the object's translation with an identity rotation at
/// registration, then refreshed from the body after every update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionState {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl MotionState {
    /// Initial state: the given translation, no rotation
    pub fn at(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
        }
    }

    pub(crate) fn refresh(&mut self, position: &Isometry<Real>) {
        let (translation, rotation) = convert::from_isometry(position);
        self.translation = translation;
        self.rotation = rotation;
    }
}
