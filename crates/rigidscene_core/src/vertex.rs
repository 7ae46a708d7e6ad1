//! Mesh vertex layout

use bytemuck::{Pod, Zeroable};
use rigidscene_math::Vec3;

/// A single mesh vertex
///
/// Tightly packed (32 bytes) so a vertex slice can be uploaded as-is and so
/// the binary object format can store it as eight consecutive floats.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Object-local position
    pub position: [f32; 3],
    /// Surface normal
    pub normal: [f32; 3],
    /// Texture coordinate (s, t)
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Size of one vertex in bytes
    pub const SIZE: usize = std::mem::size_of::<Vertex>();

    /// Number of floats in one vertex
    pub const FLOAT_COUNT: usize = 8;

    /// Create a vertex
    pub fn new(position: Vec3, normal: Vec3, tex_coords: [f32; 2]) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            tex_coords,
        }
    }

    /// Create a vertex with only a position (zero normal and texcoord)
    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Vec3::ZERO, [0.0, 0.0])
    }

    /// Position as a vector
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position.into()
    }

    /// Normal as a vector
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.normal.into()
    }

    /// All eight components in storage order: position, normal, texcoord
    pub fn to_floats(&self) -> [f32; 8] {
        let [px, py, pz] = self.position;
        let [nx, ny, nz] = self.normal;
        let [s, t] = self.tex_coords;
        [px, py, pz, nx, ny, nz, s, t]
    }

    /// Inverse of [`Vertex::to_floats`]
    pub fn from_floats(f: [f32; 8]) -> Self {
        Self {
            position: [f[0], f[1], f[2]],
            normal: [f[3], f[4], f[5]],
            tex_coords: [f[6], f[7]],
        }
    }
}
