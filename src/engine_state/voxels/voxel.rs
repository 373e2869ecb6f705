//! A single voxel cell.

/// The integer type used to store voxel type tags.
pub type VoxelTypeSize = u8;

/// One cell of a voxel grid.
///
/// # Memory Layout
/// `#[repr(C)]` keeps the one byte layout so whole grids can be cast to bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Voxel {
    /// Type tag. Zero is empty, anything else is occupied.
    pub voxel_type: VoxelTypeSize,
}

impl Voxel {
    /// The unoccupied voxel.
    pub const EMPTY: Voxel = Voxel { voxel_type: 0 };

    /// Creates a voxel with the given type tag.
    pub fn new(voxel_type: VoxelTypeSize) -> Self {
        Self { voxel_type }
    }

    /// Whether this voxel contributes geometry.
    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.voxel_type != 0
    }
}
