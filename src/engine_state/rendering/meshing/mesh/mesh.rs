//! Mesh data structures for brush rendering.
//!
//! A `BrushMesh` is the CPU side of what gets uploaded into a `MeshBuffer`: a flat
//! list of quads (four vertices each) and the triangle indices drawing them.

use cgmath::Vector3;

use super::face::quad_indices;
use crate::engine_state::rendering::BlockVertex;

/// Vertices and indices of a meshed surface.
///
/// # Invariants
/// - `vertices.len()` is a multiple of 4
/// - `indices.len() == vertices.len() / 4 * 6` once indices are built
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrushMesh {
    /// Quad vertices, four per face
    pub vertices: Vec<BlockVertex>,
    /// Triangle list indices into `vertices`
    pub indices: Vec<u32>,
}

impl BrushMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one face, moved by `offset`.
    ///
    /// # Arguments
    /// * `face` - The four template vertices of the face
    /// * `offset` - Translation applied to each vertex
    pub fn add_face(&mut self, face: &[BlockVertex], offset: Vector3<f32>) {
        debug_assert_eq!(face.len(), 4);
        self.vertices
            .extend(face.iter().map(|vertex| vertex.translated(offset)));
    }

    /// Rebuilds `indices` from the current vertex count.
    pub fn build_indices(&mut self) {
        self.indices = quad_indices(self.quad_count());
    }

    /// Number of quads in the mesh.
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of indices in the mesh.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Whether the mesh has no geometry.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Moves every vertex in place by `delta`.
    pub fn translate(&mut self, delta: Vector3<f32>) {
        for vertex in &mut self.vertices {
            vertex.translate(delta);
        }
    }

    /// Returns a moved copy of the mesh.
    pub fn translated(&self, delta: Vector3<f32>) -> Self {
        let mut mesh = self.clone();
        mesh.translate(delta);
        mesh
    }
}
