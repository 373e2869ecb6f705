//! # Engine State Module
//!
//! The editor-facing renderer and the subsystems behind it.
//!
//! ## Key Components
//!
//! * `EditorRenderer` - Owns the cursor and overlays the editor draws every frame
//! * `buffer_state` - GPU buffer registry used by the wgpu context
//! * `camera_state` - Camera access for view and projection matrices
//! * `rendering` - Meshing, mesh buffers, cursor, overlays and graphics contexts
//! * `voxels` - Voxels and brush grids
//!
//! ## Architecture
//!
//! `EditorRenderer` holds no GPU objects itself. Every call takes the
//! [`rendering::GraphicsContext`] to draw through and the [`camera_state::CameraView`]
//! to draw from, so one renderer can be driven by a real wgpu context in the editor and
//! by a recording context in tests.

use cgmath::{Point3, Vector3};
use log::info;

use crate::core::{RenderConfig, Result};

pub mod buffer_state;
pub mod camera_state;
pub mod rendering;
pub mod voxels;

use camera_state::CameraView;
use rendering::{
    meshing::mesh::BrushMesh,
    overlay::{DebugLine, WireframeBox},
    GraphicsContext, ReferenceCursor,
};
use voxels::VoxelGrid;

/// The overlays an editor draws on top of its scene.
///
/// # Examples
///
/// ```no_run
/// # fn frame(ctx: &mut dyn voxel_editor_render::GraphicsContext, camera: &dyn voxel_editor_render::CameraView) -> voxel_editor_render::Result<()> {
/// use cgmath::{Point3, Vector3};
/// use voxel_editor_render::{EditorRenderer, RenderConfig, Voxel, VoxelGrid};
///
/// let mut renderer = EditorRenderer::new(ctx, RenderConfig::default())?;
/// renderer.mesh_brush(&VoxelGrid::filled(3, 2, 1, Voxel::new(1)));
/// renderer.draw_reference_voxel(ctx, camera, Point3::new(4.0, 0.0, 2.0), true)?;
/// renderer.draw_wireframe_box(ctx, camera, Point3::new(0.0, 0.0, 0.0), Vector3::new(8.0, 8.0, 8.0), [1.0, 1.0, 0.0, 1.0])?;
/// renderer.release(ctx)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct EditorRenderer {
    config: RenderConfig,
    cursor: ReferenceCursor,
    wireframe: WireframeBox,
    debug_line: DebugLine,
}

impl EditorRenderer {
    /// Creates the cursor and overlays and uploads the wireframe cube.
    pub fn new(ctx: &mut dyn GraphicsContext, config: RenderConfig) -> Result<Self> {
        let cursor = ReferenceCursor::new(config.reference_color);
        let wireframe = WireframeBox::new(ctx, config.wireframe_line_width)?;
        let debug_line = DebugLine::new(ctx);

        info!("Editor renderer created with {:?}", config);
        Ok(Self {
            config,
            cursor,
            wireframe,
            debug_line,
        })
    }

    /// Meshes `brush` for the brushed cursor.
    pub fn mesh_brush(&mut self, brush: &VoxelGrid) -> &BrushMesh {
        self.cursor.mesh_brush(brush)
    }

    /// Draws the reference cursor, either the single cube or the meshed brush.
    pub fn draw_reference_voxel(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        camera: &dyn CameraView,
        position: Point3<f32>,
        brush_active: bool,
    ) -> Result<()> {
        self.cursor.draw(ctx, camera, position, brush_active)
    }

    /// Changes the color of the reference cube.
    pub fn set_reference_color(&mut self, rgba: [u8; 4]) {
        self.cursor.set_reference_color(rgba);
    }

    /// Draws a box outline with the configured line width.
    pub fn draw_wireframe_box(
        &self,
        ctx: &mut dyn GraphicsContext,
        camera: &dyn CameraView,
        position: Point3<f32>,
        size: Vector3<f32>,
        color: [f32; 4],
    ) -> Result<()> {
        self.wireframe.draw(ctx, camera, position, size, color)
    }

    /// Draws one debug segment.
    ///
    /// `thickness` applies to this segment only; `None` uses the configured default.
    pub fn draw_line(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        camera: &dyn CameraView,
        from: Point3<f32>,
        to: Point3<f32>,
        rgb: [u8; 3],
        thickness: Option<f32>,
    ) -> Result<()> {
        let thickness = thickness.unwrap_or(self.config.debug_line_width);
        self.debug_line.draw(ctx, camera, from, to, rgb, thickness)
    }

    /// The cursor, for inspecting its cache.
    pub fn cursor(&self) -> &ReferenceCursor {
        &self.cursor
    }

    /// The configuration the renderer was built with.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Frees every GPU buffer the renderer owns.
    ///
    /// The overlays are always freed. A second call reports `RenderError::DoubleRelease`
    /// from the cursor.
    pub fn release(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        self.debug_line.release(ctx);
        let wireframe = self.wireframe.release(ctx);
        self.cursor.release(ctx)?;
        wireframe
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{GpuError, RenderError},
        engine_state::{
            camera_state::{
                camera::{Camera, Projection},
                CameraState,
            },
            rendering::{graphics_context::recording::RecordingContext, PipelineKind},
            voxels::Voxel,
        },
    };
    use cgmath::Deg;

    fn camera() -> CameraState {
        CameraState::new(
            Camera::new(Point3::new(0.0, 5.0, -10.0), Deg(90.0), Deg(-15.0)),
            Projection::new(800, 600, Deg(70.0), 0.1, 100.0),
        )
    }

    #[test]
    fn test_frame_records_draws_in_call_order() {
        let mut ctx = RecordingContext::new();
        let camera = camera();
        let mut renderer = EditorRenderer::new(&mut ctx, RenderConfig::default()).unwrap();

        renderer.mesh_brush(&VoxelGrid::filled(2, 2, 2, Voxel::new(3)));
        renderer
            .draw_reference_voxel(&mut ctx, &camera, Point3::new(1.0, 2.0, 3.0), true)
            .unwrap();
        renderer
            .draw_wireframe_box(
                &mut ctx,
                &camera,
                Point3::new(0.0, 0.0, 0.0),
                Vector3::new(2.0, 2.0, 2.0),
                [1.0, 0.0, 0.0, 1.0],
            )
            .unwrap();
        renderer
            .draw_line(
                &mut ctx,
                &camera,
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 10.0, 0.0),
                [0, 255, 0],
                None,
            )
            .unwrap();

        let pipelines: Vec<_> = ctx.draws.iter().map(|d| d.pipeline).collect();
        assert_eq!(
            pipelines,
            [PipelineKind::Block, PipelineKind::Wireframe, PipelineKind::Line]
        );
        assert_eq!(ctx.draws[0].element_count, 24 * 6);
        assert_eq!(ctx.draws[1].line_width, 2.0);
        assert_eq!(ctx.draws[2].line_width, 1.0);
    }

    #[test]
    fn test_configured_reference_color_reaches_cube() {
        let mut ctx = RecordingContext::new();
        let config = RenderConfig::from_json_str(r#"{ "reference_color": [9, 8, 7, 6] }"#).unwrap();
        let mut renderer = EditorRenderer::new(&mut ctx, config).unwrap();

        renderer
            .draw_reference_voxel(&mut ctx, &camera(), Point3::new(0.0, 0.0, 0.0), false)
            .unwrap();

        let (vertex_buffer, _) = renderer.cursor().mesh_buffer().handles().unwrap();
        let vertices: Vec<crate::engine_state::rendering::BlockVertex> =
            ctx.contents(vertex_buffer);
        assert!(vertices.iter().all(|v| v.color == [9, 8, 7, 6]));
    }

    #[test]
    fn test_out_of_memory_surfaces_from_draw() {
        let mut ctx = RecordingContext::new();
        let mut renderer = EditorRenderer::new(&mut ctx, RenderConfig::default()).unwrap();
        ctx.fail_next_upload(GpuError::OutOfMemory);

        let result =
            renderer.draw_reference_voxel(&mut ctx, &camera(), Point3::new(1.0, 1.0, 1.0), false);
        assert!(matches!(
            result,
            Err(RenderError::Gpu(GpuError::OutOfMemory))
        ));
    }

    #[test]
    fn test_release_frees_everything_then_reports_double_release() {
        let mut ctx = RecordingContext::new();
        let camera = camera();
        let mut renderer = EditorRenderer::new(&mut ctx, RenderConfig::default()).unwrap();
        renderer
            .draw_reference_voxel(&mut ctx, &camera, Point3::new(0.0, 0.0, 0.0), false)
            .unwrap();
        assert_eq!(ctx.live_buffers(), 5);

        renderer.release(&mut ctx).unwrap();
        assert_eq!(ctx.live_buffers(), 0);
        assert!(matches!(
            renderer.release(&mut ctx),
            Err(RenderError::DoubleRelease)
        ));
    }
}
