//! Wireframe selection box.
//!
//! A unit cube made of 12 edges, uploaded once and scaled and placed per draw through
//! its model matrix.

use cgmath::{Matrix4, Point3, Vector3};

use crate::{
    core::{RenderError, Result},
    engine_state::{
        camera_state::CameraView,
        rendering::{
            graphics_context::{check_gpu_errors, DrawCall, DrawUniforms, GraphicsContext, PipelineKind, UsageHint},
            meshing::{MeshBuffer, MeshBufferState},
        },
    },
};

/// Corners of the unit cube: the bottom square, then the top square.
#[rustfmt::skip]
pub const WIREFRAME_CUBE_VERTICES: [[f32; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0],

    [0.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

/// Line list over [`WIREFRAME_CUBE_VERTICES`]: bottom ring, verticals, top ring.
#[rustfmt::skip]
pub const WIREFRAME_CUBE_INDICES: [u32; 24] = [
    0, 1, 1, 2, 2, 3, 3, 0,
    0, 4, 1, 5, 2, 6, 3, 7,
    4, 5, 5, 6, 6, 7, 7, 4,
];

/// A reusable box outline.
#[derive(Debug)]
pub struct WireframeBox {
    mesh: MeshBuffer,
    line_width: f32,
}

impl WireframeBox {
    /// Uploads the unit cube outline.
    ///
    /// # Arguments
    /// * `ctx` - Graphics context that will own the buffers
    /// * `line_width` - Width every box is drawn with
    pub fn new(ctx: &mut dyn GraphicsContext, line_width: f32) -> Result<Self> {
        let mut mesh = MeshBuffer::new("Wireframe Box", UsageHint::Static);
        mesh.upload_positions(ctx, &WIREFRAME_CUBE_VERTICES, &WIREFRAME_CUBE_INDICES)?;
        Ok(Self { mesh, line_width })
    }

    /// Model matrix placing the unit cube at `position` with extent `size`, relative to
    /// the camera.
    pub fn model_matrix(
        camera_position: Point3<f32>,
        position: Point3<f32>,
        size: Vector3<f32>,
    ) -> Matrix4<f32> {
        Matrix4::from_translation(position - camera_position)
            * Matrix4::from_nonuniform_scale(size.x, size.y, size.z)
    }

    /// Draws a box outline.
    ///
    /// # Arguments
    /// * `ctx` - Graphics context to record the draw on
    /// * `camera` - Camera the box is viewed from
    /// * `position` - World position of the box's minimum corner
    /// * `size` - Extent along each axis
    /// * `color` - RGBA in `0.0..=1.0`
    pub fn draw(
        &self,
        ctx: &mut dyn GraphicsContext,
        camera: &dyn CameraView,
        position: Point3<f32>,
        size: Vector3<f32>,
        color: [f32; 4],
    ) -> Result<()> {
        let (vertex_buffer, index_buffer) =
            self.mesh.handles().ok_or(RenderError::UseAfterRelease)?;

        let transform = camera.projection_matrix()
            * camera.view_matrix()
            * Self::model_matrix(camera.position(), position, size);

        ctx.submit_draw(DrawCall {
            pipeline: PipelineKind::Wireframe,
            vertex_buffer,
            index_buffer: Some(index_buffer),
            element_count: self.mesh.index_count(),
            uniforms: DrawUniforms::new(transform).with_color(color),
            line_width: self.line_width,
        });
        check_gpu_errors(ctx)?;
        Ok(())
    }

    /// Frees the outline's buffers. Calling it again does nothing.
    pub fn release(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        if self.mesh.state() == MeshBufferState::Released {
            return Ok(());
        }
        self.mesh.release(ctx)
    }
}
