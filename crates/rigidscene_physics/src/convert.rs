//! Conversions between RigidScene math types and rapier's nalgebra types

use rapier3d::prelude::{Isometry, Point, Real, Vector};
use rigidscene_math::{Quat, Vec3};

#[inline]
pub(crate) fn to_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

#[inline]
pub(crate) fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

#[inline]
pub(crate) fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub(crate) fn from_point(p: &Point<Real>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

/// Split an isometry into translation and rotation
pub(crate) fn from_isometry(iso: &Isometry<Real>) -> (Vec3, Quat) {
    let q = iso.rotation.quaternion();
    (from_vector(&iso.translation.vector), Quat::new(q.i, q.j, q.k, q.w))
}
