use cgmath::{Point3, Vector3};

use crate::engine_state::{rendering::BlockVertex, voxels::BlockSide};

/// Index pattern of a single quad: two counter-clockwise triangles.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Corner positions of each face of the unit cube, in `BlockSide` order.
///
/// Corners are listed counter-clockwise when viewed from outside the cube.
#[rustfmt::skip]
const FACE_CORNERS: [[[f32; 3]; 4]; 6] = [
    // FRONT (+z)
    [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
    // RIGHT (+x)
    [[1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
    // TOP (+y)
    [[0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
    // LEFT (-x)
    [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
    // BOTTOM (-y)
    [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
    // BACK (-z)
    [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
];

/// Indices for `quad_count` consecutive quads, four vertices apart.
///
/// # Arguments
/// * `quad_count` - Number of quads in the vertex buffer
///
/// # Returns
/// `quad_count * 6` indices, quad `j` using vertices `4j..4j+4`
pub fn quad_indices(quad_count: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(quad_count * 6);
    for quad in 0..quad_count as u32 {
        indices.extend(QUAD_INDICES.iter().map(|i| i + quad * 4));
    }
    indices
}

/// The 24 vertex unit cube every voxel face is copied from.
///
/// The template carries the color baked into the mesh, so recoloring the reference
/// cube means rebuilding the template.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeTemplate {
    vertices: [BlockVertex; 24],
}

impl CubeTemplate {
    /// Builds the unit cube with every vertex set to `color`.
    pub fn with_color(color: [u8; 4]) -> Self {
        let mut vertices = [BlockVertex::new(Point3::new(0.0, 0.0, 0.0), color, Vector3::unit_z()); 24];
        for side in BlockSide::all() {
            let offset = side.template_offset();
            for (corner, position) in FACE_CORNERS[side as usize].iter().enumerate() {
                vertices[offset + corner] =
                    BlockVertex::new(Point3::from(*position), color, side.normal());
            }
        }
        Self { vertices }
    }

    /// Color of the template's vertices.
    pub fn color(&self) -> [u8; 4] {
        self.vertices[0].color
    }

    /// All 24 vertices, faces in `BlockSide` order.
    pub fn vertices(&self) -> &[BlockVertex; 24] {
        &self.vertices
    }

    /// The four vertices of one face.
    pub fn face(&self, side: BlockSide) -> &[BlockVertex] {
        let offset = side.template_offset();
        &self.vertices[offset..offset + 4]
    }

    /// Index list drawing the whole cube.
    pub fn indices() -> Vec<u32> {
        quad_indices(6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    #[test]
    fn test_quad_indices() {
        assert_eq!(quad_indices(2), vec![0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]);
        assert!(quad_indices(0).is_empty());
    }

    #[test]
    fn test_template_faces_lie_on_their_plane() {
        let template = CubeTemplate::with_color([255, 0, 0, 255]);
        for side in BlockSide::all() {
            let normal = side.normal();
            let face = template.face(side);
            let expected: f32 = face
                .iter()
                .map(|v| Vector3::from(v.position).dot(normal))
                .next()
                .unwrap();
            for vertex in face {
                assert_eq!(Vector3::from(vertex.position).dot(normal), expected);
                assert_eq!(vertex.normal, Into::<[f32; 3]>::into(normal));
                assert_eq!(vertex.color, [255, 0, 0, 255]);
            }
        }
    }

    #[test]
    fn test_template_winding_faces_outward() {
        let template = CubeTemplate::with_color([0, 0, 0, 255]);
        for side in BlockSide::all() {
            let face = template.face(side);
            let a = Vector3::from(face[0].position);
            let b = Vector3::from(face[1].position);
            let c = Vector3::from(face[2].position);
            let winding = (b - a).cross(c - a);
            assert!(winding.dot(side.normal()) > 0.0, "{:?} faces inward", side);
        }
    }

    #[test]
    fn test_cube_indices_cover_all_faces() {
        let indices = CubeTemplate::indices();
        assert_eq!(indices.len(), 36);
        assert_eq!(indices.iter().copied().max(), Some(23));
    }
}
