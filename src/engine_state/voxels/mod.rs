//! # Voxel Data
//!
//! In-memory representation of the brush being edited.
//!
//! ## Architecture
//!
//! * **Voxel**: a single cell with a one byte type tag, zero meaning empty
//! * **VoxelGrid**: a dense `width * height * length` block of voxels stored flat
//! * **BlockSide**: the six face directions, in the order the mesher emits them
//!
//! The grid is indexed `z * width * height + y * width + x`. The mesher relies on this
//! layout when it looks up neighbors by index offset.

pub mod block_side;
pub mod brush;
pub mod voxel;

pub use block_side::BlockSide;
pub use brush::{Brush, VoxelGrid};
pub use voxel::{Voxel, VoxelTypeSize};
