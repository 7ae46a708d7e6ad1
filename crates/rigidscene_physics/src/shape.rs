//! Collision shapes built from mesh geometry
//!
//! The mass decides the shape kind:
//! - zero mass: an exact triangle mesh for an immovable body
//! - any other mass: the convex hull of the mesh for a movable body
//!
//! Geometry is baked with the object's scale at registration time.

use rapier3d::prelude::{MassProperties, SharedShape, Vector};
use rigidscene_core::Mesh;
use rigidscene_math::Vec3;

use crate::convert;
use crate::error::RegisterError;

/// Which kind of collision shape a registration uses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    TriangleMesh,
    ConvexHull,
}

/// Collision geometry kept alongside a registration
#[derive(Clone, Debug, PartialEq)]
pub enum CollisionShape {
    /// Static triangle soup, one vertex triple per source triangle
    TriangleMesh {
        vertices: Vec<Vec3>,
        triangles: Vec<[u32; 3]>,
    },
    /// Dynamic convex hull with its mass and principal inertia
    ConvexHull {
        points: Vec<Vec3>,
        mass: f32,
        local_inertia: Vec3,
    },
}

impl CollisionShape {
    /// Bake a static triangle mesh
    ///
    /// Each triangle `(i0, i1, i2)` is added as `(v2, v1, v0)` with every
    /// position multiplied by `scale`.
    pub fn triangle_mesh(mesh: &Mesh, scale: Vec3) -> Self {
        let mut vertices = Vec::with_capacity(mesh.index_count());
        let mut triangles = Vec::with_capacity(mesh.triangle_count());
        let position = |i: u32| mesh.vertices()[i as usize].position().component_mul(scale);

        for [i0, i1, i2] in mesh.triangles() {
            let base = vertices.len() as u32;
            vertices.push(position(i2));
            vertices.push(position(i1));
            vertices.push(position(i0));
            triangles.push([base, base + 1, base + 2]);
        }

        CollisionShape::TriangleMesh { vertices, triangles }
    }

    /// Collect hull points for a dynamic body
    ///
    /// Every position visited through the index buffer is added, repeats
    /// included, scaled by `scale`. Inertia is filled in when the backend
    /// shape is built.
    pub fn convex_hull(mesh: &Mesh, scale: Vec3, mass: f32) -> Self {
        let points = mesh
            .indexed_positions()
            .map(|p| p.component_mul(scale))
            .collect();
        CollisionShape::ConvexHull {
            points,
            mass,
            local_inertia: Vec3::ZERO,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            CollisionShape::TriangleMesh { .. } => ShapeKind::TriangleMesh,
            CollisionShape::ConvexHull { .. } => ShapeKind::ConvexHull,
        }
    }

    /// Principal inertia for the shape's mass; `None` for static meshes
    pub fn local_inertia(&self) -> Option<Vec3> {
        match self {
            CollisionShape::TriangleMesh { .. } => None,
            CollisionShape::ConvexHull { local_inertia, .. } => Some(*local_inertia),
        }
    }

    /// Bounding box of the baked geometry
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let points = match self {
            CollisionShape::TriangleMesh { vertices, .. } => vertices,
            CollisionShape::ConvexHull { points, .. } => points,
        };
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold((*first, *first), |(min, max), p| {
            (min.min_components(*p), max.max_components(*p))
        }))
    }

    /// Build the backend shape
    ///
    /// Returns mass properties for convex hulls. On success the hull's
    /// `local_inertia` is updated to match.
    pub(crate) fn build(&mut self) -> Result<(SharedShape, Option<MassProperties>), RegisterError> {
        match self {
            CollisionShape::TriangleMesh { vertices, triangles } => {
                if triangles.is_empty() {
                    return Err(RegisterError::DegenerateGeometry("mesh has no triangles".into()));
                }
                let points = vertices.iter().map(|v| convert::to_point(*v)).collect();
                // Non-empty triangles keep the backend's index assertion satisfied
                let shape = SharedShape::trimesh(points, triangles.clone());
                Ok((shape, None))
            }
            CollisionShape::ConvexHull { points, mass, local_inertia } => {
                if points.is_empty() {
                    return Err(RegisterError::DegenerateGeometry("mesh has no triangles".into()));
                }
                let hull_points: Vec<_> = points.iter().map(|p| convert::to_point(*p)).collect();
                let shape = SharedShape::convex_hull(&hull_points).ok_or_else(|| {
                    RegisterError::DegenerateGeometry("convex hull could not be computed".into())
                })?;

                // Scale unit-density properties to the requested mass
                let unit_mass = shape.mass_properties(1.0).mass();
                let props = if unit_mass.is_finite() && unit_mass > 0.0 {
                    shape.mass_properties(*mass / unit_mass)
                } else {
                    bounds_mass_properties(&shape, *mass)
                };
                *local_inertia = convert::from_vector(&props.principal_inertia());
                Ok((shape, Some(props)))
            }
        }
    }
}

/// Padding added to each side of a hull's bounds for box inertia
const HULL_MARGIN: f32 = 0.04;

/// Box inertia over the margin-padded bounds of a shape
///
/// Used for hulls without volume, such as a single triangle or a plane.
fn bounds_mass_properties(shape: &SharedShape, mass: f32) -> MassProperties {
    let aabb = shape.compute_local_aabb();
    let half = aabb.half_extents();
    let (lx, ly, lz) = (
        2.0 * (half.x + HULL_MARGIN),
        2.0 * (half.y + HULL_MARGIN),
        2.0 * (half.z + HULL_MARGIN),
    );
    let inertia = Vector::new(ly * ly + lz * lz, lx * lx + lz * lz, lx * lx + ly * ly) * (mass / 12.0);
    MassProperties::new(aabb.center(), mass, inertia)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigidscene_core::Vertex;

    fn quad() -> Mesh {
        let v = |x: f32, z: f32| Vertex::from_position(Vec3::new(x, 0.0, z));
        Mesh::new(vec![v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0)], vec![0, 1, 2, 0, 2, 3])
            .unwrap()
    }

    #[test]
    fn test_triangle_mesh_reverses_winding_and_scales() {
        let mesh = quad();
        let shape = CollisionShape::triangle_mesh(&mesh, Vec3::new(2.0, 1.0, 3.0));
        match &shape {
            CollisionShape::TriangleMesh { vertices, triangles } => {
                assert_eq!(triangles.len(), 2);
                assert_eq!(vertices.len(), 6);
                // First source triangle is (0, 1, 2); baked as (v2, v1, v0)
                assert_eq!(vertices[0], Vec3::new(2.0, 0.0, 3.0));
                assert_eq!(vertices[1], Vec3::new(2.0, 0.0, 0.0));
                assert_eq!(vertices[2], Vec3::new(0.0, 0.0, 0.0));
            }
            other => panic!("Expected triangle mesh, got {:?}", other),
        }
        assert_eq!(shape.kind(), ShapeKind::TriangleMesh);
        assert_eq!(shape.local_inertia(), None);
    }

    #[test]
    fn test_convex_hull_keeps_repeated_points() {
        let shape = CollisionShape::convex_hull(&quad(), Vec3::ONE, 2.0);
        match &shape {
            CollisionShape::ConvexHull { points, mass, .. } => {
                assert_eq!(points.len(), 6);
                assert_eq!(*mass, 2.0);
            }
            other => panic!("Expected convex hull, got {:?}", other),
        }
        assert_eq!(shape.kind(), ShapeKind::ConvexHull);
    }

    #[test]
    fn test_bounds_reflect_scale() {
        let mesh = Mesh::cuboid(Vec3::ONE);
        let shape = CollisionShape::convex_hull(&mesh, Vec3::new(1.0, 2.0, 3.0), 1.0);
        let (min, max) = shape.bounds().unwrap();
        assert_eq!(min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_build_hull_computes_inertia_for_mass() {
        let mesh = Mesh::cuboid(Vec3::splat(0.5));
        let mut shape = CollisionShape::convex_hull(&mesh, Vec3::ONE, 6.0);
        let (_, props) = shape.build().unwrap();
        let props = props.unwrap();
        assert!((props.mass() - 6.0).abs() < 1e-4);

        // Unit cube of mass m: I = m / 6 on every axis
        let inertia = shape.local_inertia().unwrap();
        for c in inertia.to_array() {
            assert!((c - 1.0).abs() < 1e-3, "inertia {:?}", inertia);
        }
    }

    #[test]
    fn test_build_flat_hull_uses_bounds_inertia() {
        let mesh = Mesh::triangle();
        let mut shape = CollisionShape::convex_hull(&mesh, Vec3::ONE, 1.0);
        let (_, props) = shape.build().unwrap();
        assert!((props.unwrap().mass() - 1.0).abs() < 1e-6);

        let inertia = shape.local_inertia().unwrap();
        for c in inertia.to_array() {
            assert!(c.is_finite() && c > 0.0, "inertia {:?}", inertia);
        }
        // Box of 1.08 x 1.08 x 0.08: the flat z axis has the largest moment
        let (lx, lz) = (1.0 + 2.0 * HULL_MARGIN, 2.0 * HULL_MARGIN);
        assert!((inertia.x - (lx * lx + lz * lz) / 12.0).abs() < 1e-4);
        assert!((inertia.z - (lx * lx + lx * lx) / 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_build_trimesh() {
        let mut shape = CollisionShape::triangle_mesh(&quad(), Vec3::ONE);
        let (backend, props) = shape.build().unwrap();
        assert!(props.is_none());
        assert_eq!(backend.as_trimesh().map(|t| t.indices().len()), Some(2));
    }

    #[test]
    fn test_build_empty_mesh_is_degenerate() {
        let mesh = Mesh::new(Vec::new(), Vec::new()).unwrap();
        let mut hull = CollisionShape::convex_hull(&mesh, Vec3::ONE, 1.0);
        assert!(matches!(hull.build(), Err(RegisterError::DegenerateGeometry(_))));
        let mut tris = CollisionShape::triangle_mesh(&mesh, Vec3::ONE);
        assert!(matches!(tris.build(), Err(RegisterError::DegenerateGeometry(_))));
    }
}
