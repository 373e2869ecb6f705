//! # Block Side Module
//!
//! The six faces of a voxel and the grid offsets used to find the neighbor behind each.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel.
///
/// The discriminants are the emission order of the face mesher and the order of the
/// faces in the cube template: FRONT, RIGHT, TOP, LEFT, BOTTOM, BACK.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The right face (facing positive X)
    RIGHT = 1,

    /// The top face (facing positive Y)
    TOP = 2,

    /// The left face (facing negative X)
    LEFT = 3,

    /// The bottom face (facing negative Y)
    BOTTOM = 4,

    /// The back face (facing negative Z)
    BACK = 5,
}

impl BlockSide {
    /// Returns all six faces in emission order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::RIGHT,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::BOTTOM,
            BlockSide::BACK,
        ]
    }

    /// Index of this face's first vertex in the 24 vertex cube template.
    pub fn template_offset(self) -> usize {
        self as usize * 4
    }

    /// Outward unit normal of the face.
    pub fn normal(self) -> Vector3<f32> {
        match self {
            BlockSide::FRONT => Vector3::unit_z(),
            BlockSide::RIGHT => Vector3::unit_x(),
            BlockSide::TOP => Vector3::unit_y(),
            BlockSide::LEFT => -Vector3::unit_x(),
            BlockSide::BOTTOM => -Vector3::unit_y(),
            BlockSide::BACK => -Vector3::unit_z(),
        }
    }

    /// Signed step in grid coordinates towards the neighbor behind this face.
    pub fn grid_step(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::BACK => Vector3::new(0, 0, -1),
        }
    }

    /// Signed offset in the flat grid index towards the neighbor behind this face.
    ///
    /// # Arguments
    /// * `width` - Grid extent along X
    /// * `height` - Grid extent along Y
    ///
    /// # Returns
    /// `±width * height` for the Z faces, `±width` for the Y faces and `±1` for the X faces
    pub fn index_offset(self, width: usize, height: usize) -> isize {
        let layer = (width * height) as isize;
        let row = width as isize;
        match self {
            BlockSide::FRONT => layer,
            BlockSide::RIGHT => 1,
            BlockSide::TOP => row,
            BlockSide::LEFT => -1,
            BlockSide::BOTTOM => -row,
            BlockSide::BACK => -layer,
        }
    }
}
