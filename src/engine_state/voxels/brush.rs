//! # Brush Module
//!
//! A dense, fixed-size voxel grid. The dimensions never change after construction, so
//! index arithmetic done by the mesher stays valid for the grid's lifetime.

use cgmath::Point3;

use crate::core::{RenderError, Result};

use super::{block_side::BlockSide, voxel::Voxel};

/// A rectangular block of voxels stored in a flat vector.
///
/// # Memory Layout
/// Voxel `(x, y, z)` lives at `z * width * height + y * width + x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelGrid {
    width: usize,
    height: usize,
    length: usize,
    voxels: Vec<Voxel>,
}

/// The grid the editor places into the world.
pub type Brush = VoxelGrid;

impl VoxelGrid {
    /// Creates an empty grid.
    pub fn new(width: usize, height: usize, length: usize) -> Self {
        Self::filled(width, height, length, Voxel::EMPTY)
    }

    /// Creates a grid with every cell set to `voxel`.
    pub fn filled(width: usize, height: usize, length: usize, voxel: Voxel) -> Self {
        Self {
            width,
            height,
            length,
            voxels: vec![voxel; width * height * length],
        }
    }

    /// Wraps an existing voxel buffer.
    ///
    /// # Arguments
    /// * `width`, `height`, `length` - Grid extents along X, Y and Z
    /// * `voxels` - Cells in `z, y, x` order
    ///
    /// # Returns
    /// The grid, or `RenderError::GridSize` if the buffer length is not
    /// `width * height * length`
    pub fn from_voxels(
        width: usize,
        height: usize,
        length: usize,
        voxels: Vec<Voxel>,
    ) -> Result<Self> {
        let expected = width * height * length;
        if voxels.len() != expected {
            return Err(RenderError::GridSize {
                expected,
                actual: voxels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            length,
            voxels,
        })
    }

    /// Extent along X.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Extent along Y.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Extent along Z.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// Whether the grid has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// All cells in storage order.
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// Flat index of a cell, or `None` when the coordinate is outside the grid.
    pub fn index(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        if x < self.width && y < self.height && z < self.length {
            Some(z * self.width * self.height + y * self.width + x)
        } else {
            None
        }
    }

    /// Reads a cell.
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<Voxel> {
        self.index(x, y, z).map(|i| self.voxels[i])
    }

    /// Writes a cell. Returns the previous value, or `None` when out of bounds.
    pub fn set(&mut self, x: usize, y: usize, z: usize, voxel: Voxel) -> Option<Voxel> {
        let i = self.index(x, y, z)?;
        Some(std::mem::replace(&mut self.voxels[i], voxel))
    }

    /// Whether the cell at the coordinate exists and is occupied.
    pub fn is_occupied(&self, x: usize, y: usize, z: usize) -> bool {
        self.get(x, y, z).is_some_and(|v| v.is_occupied())
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.voxels.iter().filter(|v| v.is_occupied()).count()
    }

    /// Whether the neighbor behind `side` of cell `(x, y, z)` is occupied.
    ///
    /// Cells on the grid boundary have no neighbor in the outward direction, so this
    /// returns `false` there. Otherwise the neighbor is read through the flat index
    /// offset for `side`.
    pub fn neighbor_occupied(&self, position: Point3<usize>, side: BlockSide) -> bool {
        let step = side.grid_step();
        let in_bounds = |coord: usize, step: i32, extent: usize| match step {
            -1 => coord > 0,
            1 => coord + 1 < extent,
            _ => true,
        };
        if !(in_bounds(position.x, step.x, self.width)
            && in_bounds(position.y, step.y, self.height)
            && in_bounds(position.z, step.z, self.length))
        {
            return false;
        }

        let Some(index) = self.index(position.x, position.y, position.z) else {
            return false;
        };
        let neighbor = index as isize + side.index_offset(self.width, self.height);
        self.voxels[neighbor as usize].is_occupied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_layout() {
        let grid = VoxelGrid::new(3, 4, 5);
        assert_eq!(grid.len(), 60);
        assert_eq!(grid.index(0, 0, 0), Some(0));
        assert_eq!(grid.index(1, 0, 0), Some(1));
        assert_eq!(grid.index(0, 1, 0), Some(3));
        assert_eq!(grid.index(0, 0, 1), Some(12));
        assert_eq!(grid.index(2, 3, 4), Some(59));
        assert_eq!(grid.index(3, 0, 0), None);
    }

    #[test]
    fn test_from_voxels_checks_length() {
        let err = VoxelGrid::from_voxels(2, 2, 2, vec![Voxel::EMPTY; 7]).unwrap_err();
        assert!(matches!(
            err,
            RenderError::GridSize {
                expected: 8,
                actual: 7
            }
        ));
        assert!(VoxelGrid::from_voxels(2, 2, 2, vec![Voxel::EMPTY; 8]).is_ok());
    }

    #[test]
    fn test_set_and_get() {
        let mut grid = VoxelGrid::new(2, 2, 2);
        assert_eq!(grid.set(1, 1, 1, Voxel::new(3)), Some(Voxel::EMPTY));
        assert_eq!(grid.get(1, 1, 1), Some(Voxel::new(3)));
        assert!(grid.is_occupied(1, 1, 1));
        assert_eq!(grid.set(2, 0, 0, Voxel::new(1)), None);
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn test_neighbor_lookup_uses_full_layer_for_front() {
        // width * height = 9 while width + height = 6, so a wrong layer stride would
        // land on a different cell.
        let mut grid = VoxelGrid::new(3, 3, 3);
        grid.set(0, 0, 0, Voxel::new(1));
        grid.set(0, 0, 1, Voxel::new(1));
        grid.set(0, 2, 0, Voxel::new(1));

        assert!(grid.neighbor_occupied(Point3::new(0, 0, 0), BlockSide::FRONT));
        assert!(grid.neighbor_occupied(Point3::new(0, 0, 1), BlockSide::BACK));
        assert!(!grid.neighbor_occupied(Point3::new(0, 0, 0), BlockSide::TOP));
    }

    #[test]
    fn test_boundary_has_no_neighbor() {
        let grid = VoxelGrid::filled(2, 1, 1, Voxel::new(1));
        assert!(grid.neighbor_occupied(Point3::new(0, 0, 0), BlockSide::RIGHT));
        assert!(!grid.neighbor_occupied(Point3::new(1, 0, 0), BlockSide::RIGHT));
        assert!(!grid.neighbor_occupied(Point3::new(0, 0, 0), BlockSide::LEFT));
        assert!(!grid.neighbor_occupied(Point3::new(0, 0, 0), BlockSide::TOP));
    }
}
