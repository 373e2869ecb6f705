//! Mesh generation for brushes.
//!
//! This module converts voxel grids into GPU-friendly vertex and index lists.
//!
//! # Architecture
//! - [`CubeTemplate`]: the 24 vertex unit cube faces are copied from
//! - [`BrushMesh`]: vertices and indices of a meshed surface
//! - [`mesh_brush`]: face-culling mesher emitting one quad per visible face
//!
//! # Usage
//! ```no_run
//! use voxel_editor_render::{mesh_brush, CubeTemplate, Voxel, VoxelGrid};
//!
//! let brush = VoxelGrid::filled(2, 1, 1, Voxel::new(1));
//! let mesh = mesh_brush(&brush, &CubeTemplate::with_color([255, 255, 255, 255]));
//! assert_eq!(mesh.quad_count(), 10);
//! ```

mod culling;
mod face;
mod mesh;

pub use culling::{mesh_brush, mesh_brush_at};
pub use face::{quad_indices, CubeTemplate, QUAD_INDICES};
pub use mesh::*;
