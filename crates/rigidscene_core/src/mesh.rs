//! Geometry model: immutable vertex and index buffers
//!
//! A [`Mesh`] is shared between scene objects, the renderer and the collision
//! shape builder, usually through an `Arc<Mesh>`. It never changes after
//! construction; replacing an object's geometry means attaching a new mesh.

use rigidscene_math::Vec3;
use crate::Vertex;

/// Immutable triangle mesh
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Mesh {
    /// Create a mesh from vertices and triangle indices
    ///
    /// Every index must reference an existing vertex and the index count must
    /// be a multiple of three.
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle { index_count: indices.len() });
        }
        let vertex_count = vertices.len();
        if let Some((position, &index)) = indices
            .iter()
            .enumerate()
            .find(|(_, i)| **i as usize >= vertex_count)
        {
            return Err(MeshError::IndexOutOfRange { position, index, vertex_count });
        }
        Ok(Self { vertices, indices })
    }

    /// Build a mesh whose indices are known to be valid
    pub(crate) fn from_parts_unchecked(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        debug_assert!(indices.len() % 3 == 0);
        debug_assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
        Self { vertices, indices }
    }

    /// Vertices in insertion order
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Indices in insertion order (consecutive triples form triangles)
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True if the mesh has no triangles
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over triangles as index triples, in source winding
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]])
    }

    /// Iterate over the positions visited through the index buffer
    ///
    /// Shared vertices are yielded once per reference.
    pub fn indexed_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.indices.iter().map(|&i| self.vertices[i as usize].position())
    }

    /// Local-space bounding box (min, max) of the indexed positions
    ///
    /// Returns `None` for a mesh without triangles.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut positions = self.indexed_positions();
        let first = positions.next()?;
        Some(positions.fold((first, first), |(min, max), p| {
            (min.min_components(p), max.max_components(p))
        }))
    }

    /// Raw bytes of the vertex buffer, ready for upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw bytes of the index buffer, ready for upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Error constructing a mesh
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// An index refers past the end of the vertex buffer
    IndexOutOfRange {
        /// Position of the offending entry in the index buffer
        position: usize,
        /// The index value
        index: u32,
        /// Number of vertices in the mesh
        vertex_count: usize,
    },
    /// The index count is not a multiple of three
    IncompleteTriangle {
        index_count: usize,
    },
}

impl std::fmt::Display for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::IndexOutOfRange { position, index, vertex_count } => write!(
                f,
                "index {} at position {} is out of range for {} vertices",
                index, position, vertex_count
            ),
            MeshError::IncompleteTriangle { index_count } => {
                write!(f, "index count {} is not a multiple of 3", index_count)
            }
        }
    }
}

impl std::error::Error for MeshError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertices(n: usize) -> Vec<Vertex> {
        (0..n)
            .map(|i| Vertex::from_position(Vec3::new(i as f32, 0.0, -(i as f32))))
            .collect()
    }

    #[test]
    fn test_new_valid() {
        let mesh = Mesh::new(vertices(3), vec![0, 1, 2]).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(!mesh.is_empty());
    }

    #[test]
    fn test_index_out_of_range() {
        let err = Mesh::new(vertices(3), vec![0, 1, 3]).unwrap_err();
        assert_eq!(
            err,
            MeshError::IndexOutOfRange { position: 2, index: 3, vertex_count: 3 }
        );
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_incomplete_triangle() {
        let err = Mesh::new(vertices(3), vec![0, 1]).unwrap_err();
        assert_eq!(err, MeshError::IncompleteTriangle { index_count: 2 });
    }

    #[test]
    fn test_empty_mesh_is_allowed() {
        let mesh = Mesh::new(Vec::new(), Vec::new()).unwrap();
        assert!(mesh.is_empty());
        assert!(mesh.bounds().is_none());
    }

    #[test]
    fn test_triangles_keep_source_winding() {
        let mesh = Mesh::new(vertices(4), vec![0, 1, 2, 2, 3, 0]).unwrap();
        let tris: Vec<_> = mesh.triangles().collect();
        assert_eq!(tris, vec![[0, 1, 2], [2, 3, 0]]);
    }

    #[test]
    fn test_indexed_positions_repeat_shared_vertices() {
        let mesh = Mesh::new(vertices(4), vec![0, 1, 2, 2, 3, 0]).unwrap();
        assert_eq!(mesh.indexed_positions().count(), 6);
    }

    #[test]
    fn test_bounds_ignore_unreferenced_vertices() {
        let mut verts = vertices(3);
        verts.push(Vertex::from_position(Vec3::splat(100.0)));
        let mesh = Mesh::new(verts, vec![0, 1, 2]).unwrap();
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(max, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_byte_views() {
        let mesh = Mesh::new(vertices(3), vec![0, 1, 2]).unwrap();
        assert_eq!(mesh.vertex_bytes().len(), 3 * Vertex::SIZE);
        assert_eq!(mesh.index_bytes().len(), 3 * 4);
    }
}
