//! Rendering system for the voxel editor overlays.
//!
//! This module contains everything between an editor model and the GPU: brush meshing,
//! mesh buffers, the reference cursor and the wireframe and line overlays. Nothing in it
//! talks to wgpu directly except [`WgpuContext`]; everything else goes through the
//! [`GraphicsContext`] trait so it can be exercised without a GPU.

pub mod cursor;
pub mod graphics_context;
pub mod meshing;
pub mod overlay;
pub mod texture;
mod vertex;
mod wgpu_context;

// Re-export commonly used types
pub use cursor::{grid_position, CursorMode, ReferenceCursor};
pub use graphics_context::{
    check_gpu_errors, BufferHandle, BufferKind, DrawCall, DrawUniforms, GraphicsContext,
    PipelineKind, UsageHint,
};
pub use vertex::{position_desc, BlockVertex, LineVertex};
pub use wgpu_context::WgpuContext;
