//! 4x4 Matrix utilities for object transforms
//!
//! Matrices are stored row-major (`m[row][col]`) and points are treated as
//! **row vectors**: `p' = p * M`. Translation therefore lives in the last row,
//! and `mul(a, b)` applies `a` first, then `b`. An object matrix composed as
//! `S * R * T` scales, then rotates, then translates.
//!
//! # Rotation convention
//!
//! [`from_quat`] lays out the quaternion's rotation matrix the way it would be
//! written for column vectors. Applied to row vectors that matrix is its own
//! transpose, so a matrix built from `q` rotates points by `q⁻¹`. Code that
//! feeds rotations from a column-vector source (such as the physics backend)
//! must invert the quaternion before storing it on a scene object.

use crate::{Quat, Vec3};

/// 4x4 matrix type (row-major, row vectors)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Non-uniform scaling matrix
pub fn scaling(s: Vec3) -> Mat4 {
    let mut m = IDENTITY;
    m[0][0] = s.x;
    m[1][1] = s.y;
    m[2][2] = s.z;
    m
}

/// Translation matrix (offset stored in the last row)
pub fn translation(t: Vec3) -> Mat4 {
    let mut m = IDENTITY;
    m[3][0] = t.x;
    m[3][1] = t.y;
    m[3][2] = t.z;
    m
}

/// Rotation matrix from a quaternion
///
/// See the module docs: applied to row vectors this rotates by `q⁻¹`.
/// The quaternion is normalized first.
pub fn from_quat(q: Quat) -> Mat4 {
    let q = q.normalize();
    let (x, y, z, w) = (q.x, q.y, q.z, q.w);

    let xx = x * x;
    let yy = y * y;
    let zz = z * z;
    let xy = x * y;
    let xz = x * z;
    let yz = y * z;
    let wx = w * x;
    let wy = w * y;
    let wz = w * z;

    [
        [1.0 - 2.0 * (yy + zz), 2.0 * (xy - wz), 2.0 * (xz + wy), 0.0],
        [2.0 * (xy + wz), 1.0 - 2.0 * (xx + zz), 2.0 * (yz - wx), 0.0],
        [2.0 * (xz - wy), 2.0 * (yz + wx), 1.0 - 2.0 * (xx + yy), 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Multiply two 4x4 matrices: result = a * b
///
/// With row vectors this applies `a` first, then `b`.
#[allow(clippy::needless_range_loop)]
pub fn mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut result = [[0.0f32; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }

    result
}

/// Scale, then rotate, then translate: `S * R * T`
pub fn scale_rotate_translate(scale: Vec3, rotation: Quat, offset: Vec3) -> Mat4 {
    mul(mul(scaling(scale), from_quat(rotation)), translation(offset))
}

/// Transform a point (implicit w = 1) as a row vector: `p * M`
pub fn transform_point(m: Mat4, p: Vec3) -> Vec3 {
    Vec3::new(
        p.x * m[0][0] + p.y * m[1][0] + p.z * m[2][0] + m[3][0],
        p.x * m[0][1] + p.y * m[1][1] + p.z * m[2][1] + m[3][1],
        p.x * m[0][2] + p.y * m[1][2] + p.z * m[2][2] + m[3][2],
    )
}

/// Transpose a matrix
pub fn transpose(m: Mat4) -> Mat4 {
    [
        [m[0][0], m[1][0], m[2][0], m[3][0]],
        [m[0][1], m[1][1], m[2][1], m[3][1]],
        [m[0][2], m[1][2], m[2][2], m[3][2]],
        [m[0][3], m[1][3], m[2][3], m[3][3]],
    ]
}

/// Element-wise comparison within `epsilon`
pub fn abs_diff_eq(a: Mat4, b: Mat4, epsilon: f32) -> bool {
    a.iter()
        .flatten()
        .zip(b.iter().flatten())
        .all(|(x, y)| (x - y).abs() <= epsilon)
}
