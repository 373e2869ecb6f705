#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Editor Render
//!
//! Brush meshing and GPU overlays for a voxel editor, built with Rust and WGPU.
//!
//! The crate turns an in-memory brush into a lit, face-culled mesh and draws the
//! editor's overlays on top of an existing scene: the reference cursor that previews
//! the next placement, a wireframe selection box and debug lines.
//!
//! ## Key Modules
//!
//! * `core` - Configuration and error types
//! * `engine_state` - Meshing, mesh buffers, cursor, overlays and the graphics contexts
//!
//! ## Architecture
//!
//! Everything that touches the GPU goes through the [`GraphicsContext`] trait. The
//! production implementation is [`WgpuContext`], which records draws and replays them in
//! one render pass per [`WgpuContext::flush`]. GPU errors are polled after every upload
//! and draw; out-of-memory is returned to the caller, everything else is logged.
//!
//! ## Usage
//!
//! ```no_run
//! use voxel_editor_render::{mesh_brush, CubeTemplate, Voxel, VoxelGrid};
//!
//! let mut brush = VoxelGrid::new(4, 4, 4);
//! brush.set(1, 2, 1, Voxel::new(7));
//! let mesh = mesh_brush(&brush, &CubeTemplate::with_color([0, 0, 0, 100]));
//! assert_eq!(mesh.quad_count(), 6);
//! ```
//!
//! ## Performance Considerations
//!
//! * Cursor geometry is only uploaded when its grid position, mode or color changes
//! * Moving a brush translates the cached mesh instead of remeshing it
//! * Streamed buffers are orphaned rather than synchronized with in-flight draws

pub mod core;
pub mod engine_state;

pub use crate::core::{GpuError, RenderConfig, RenderError, Result};
pub use engine_state::{
    buffer_state::{BufferAnalytics, BufferState},
    camera_state::{
        camera::{Camera, Projection},
        camera_relative_transform, CameraState, CameraView,
    },
    rendering::{
        check_gpu_errors,
        meshing::{
            mesh::{mesh_brush, mesh_brush_at, BrushMesh, CubeTemplate},
            MeshBuffer, MeshBufferState,
        },
        overlay::{DebugLine, WireframeBox},
        texture::Texture,
        BlockVertex, BufferHandle, BufferKind, CursorMode, DrawCall, DrawUniforms,
        GraphicsContext, LineVertex, PipelineKind, ReferenceCursor, UsageHint, WgpuContext,
    },
    voxels::{BlockSide, Brush, Voxel, VoxelGrid},
    EditorRenderer,
};

/// Initializes `env_logger` writing to stdout, filtered by `RUST_LOG`.
///
/// Call once at startup. Later calls are ignored.
pub fn init_logger() {
    let mut log_builder = env_logger::Builder::new();
    let initialized = log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .try_init()
        .is_ok();

    if initialized {
        log::info!("Logger initialized");
    }
}
