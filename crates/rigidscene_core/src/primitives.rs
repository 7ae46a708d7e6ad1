//! Procedural meshes
//!
//! All primitives are built in object-local space, centered at the origin,
//! with counter-clockwise winding when viewed from outside.

use rigidscene_math::Vec3;
use crate::{Mesh, Vertex};

const QUAD_TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Faces of a box as (normal, u, v) with `u × v = normal`
const BOX_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::Y, Vec3::Z),
    (Vec3::new(-1.0, 0.0, 0.0), Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::Z, Vec3::X),
    (Vec3::new(0.0, -1.0, 0.0), Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::new(0.0, 0.0, -1.0), Vec3::Y, Vec3::X),
];

impl Mesh {
    /// A single right triangle in the XY plane facing +Z
    pub fn triangle() -> Self {
        let normal = Vec3::Z;
        let vertices = vec![
            Vertex::new(Vec3::new(0.0, 0.0, 0.0), normal, [0.0, 0.0]),
            Vertex::new(Vec3::new(1.0, 0.0, 0.0), normal, [1.0, 0.0]),
            Vertex::new(Vec3::new(0.0, 1.0, 0.0), normal, [0.0, 1.0]),
        ];
        Self::from_parts_unchecked(vertices, vec![0, 1, 2])
    }

    /// An axis-aligned box with the given half extents
    ///
    /// Each face has its own four vertices so normals stay flat.
    pub fn cuboid(half_extents: Vec3) -> Self {
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, u, v) in BOX_FACES {
            let base = vertices.len() as u32;
            let corners = [-u - v, u - v, u + v, -u + v];
            for (corner, tex) in corners.iter().zip(QUAD_TEX_COORDS) {
                let position = (normal + *corner).component_mul(half_extents);
                vertices.push(Vertex::new(position, normal, tex));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::from_parts_unchecked(vertices, indices)
    }

    /// A square in the XZ plane facing +Y
    pub fn plane(half_size: f32) -> Self {
        let (u, v) = (Vec3::Z, Vec3::X);
        let corners = [-u - v, u - v, u + v, -u + v];
        let vertices = corners
            .iter()
            .zip(QUAD_TEX_COORDS)
            .map(|(corner, tex)| Vertex::new(*corner * half_size, Vec3::Y, tex))
            .collect();
        Self::from_parts_unchecked(vertices, vec![0, 1, 2, 0, 2, 3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    /// Geometric normal of a triangle from its winding
    fn face_normal(mesh: &Mesh, tri: [u32; 3]) -> Vec3 {
        let p = |i: u32| mesh.vertices()[i as usize].position();
        (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0])).normalized()
    }

    #[test]
    fn test_triangle() {
        let mesh = Mesh::triangle();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.index_count(), 3);
        assert!((face_normal(&mesh, [0, 1, 2]) - Vec3::Z).length() < EPSILON);
    }

    #[test]
    fn test_cuboid_counts_and_bounds() {
        let mesh = Mesh::cuboid(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_cuboid_winding_faces_outward() {
        let mesh = Mesh::cuboid(Vec3::ONE);
        for tri in mesh.triangles() {
            let stored = mesh.vertices()[tri[0] as usize].normal();
            let geometric = face_normal(&mesh, tri);
            assert!(
                (stored - geometric).length() < EPSILON,
                "triangle {:?}: stored {:?}, winding {:?}",
                tri, stored, geometric
            );
            // Outward: normal points away from the center
            let center = mesh.vertices()[tri[0] as usize].position();
            assert!(geometric.dot(center) > 0.0);
        }
    }

    #[test]
    fn test_plane_faces_up() {
        let mesh = Mesh::plane(5.0);
        assert_eq!(mesh.triangle_count(), 2);
        for tri in mesh.triangles() {
            assert!((face_normal(&mesh, tri) - Vec3::Y).length() < EPSILON);
        }
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Vec3::new(-5.0, 0.0, -5.0));
        assert_eq!(max, Vec3::new(5.0, 0.0, 5.0));
    }
}
