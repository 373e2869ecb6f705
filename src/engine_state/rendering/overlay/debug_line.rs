//! Single-segment debug lines.
//!
//! One shared two-vertex buffer is refilled on every draw. The buffer is uploaded with
//! [`UsageHint::Stream`], so the context orphans the previous storage instead of
//! waiting for draws that still read it.

use cgmath::Point3;

use crate::{
    core::{RenderError, Result},
    engine_state::{
        camera_state::{camera_relative_transform, CameraView},
        rendering::{
            graphics_context::{check_gpu_errors, BufferHandle, BufferKind, DrawCall, DrawUniforms, GraphicsContext, PipelineKind, UsageHint},
            LineVertex,
        },
    },
};

/// Draws one line segment per call.
#[derive(Debug)]
pub struct DebugLine {
    vertex_buffer: BufferHandle,
    released: bool,
}

impl DebugLine {
    /// Allocates the shared vertex buffer.
    pub fn new(ctx: &mut dyn GraphicsContext) -> Self {
        Self {
            vertex_buffer: ctx.create_buffer("Debug Line Vertex Buffer", BufferKind::Vertex),
            released: false,
        }
    }

    /// Draws a segment from `from` to `to`.
    ///
    /// # Arguments
    /// * `ctx` - Graphics context to upload to and record the draw on
    /// * `camera` - Camera the line is viewed from
    /// * `from`, `to` - Endpoints in world space
    /// * `rgb` - Line color; alpha is always opaque
    /// * `thickness` - Line width for this draw only
    pub fn draw(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        camera: &dyn CameraView,
        from: Point3<f32>,
        to: Point3<f32>,
        rgb: [u8; 3],
        thickness: f32,
    ) -> Result<()> {
        if self.released {
            return Err(RenderError::UseAfterRelease);
        }

        let color = [rgb[0], rgb[1], rgb[2], 255];
        let vertices = [LineVertex::new(from, color), LineVertex::new(to, color)];
        ctx.upload(
            self.vertex_buffer,
            bytemuck::cast_slice(&vertices),
            UsageHint::Stream,
        );

        ctx.submit_draw(DrawCall {
            pipeline: PipelineKind::Line,
            vertex_buffer: self.vertex_buffer,
            index_buffer: None,
            element_count: 2,
            uniforms: DrawUniforms::new(camera_relative_transform(camera)),
            line_width: thickness,
        });
        check_gpu_errors(ctx)?;
        Ok(())
    }

    /// Frees the shared vertex buffer. Calling it again does nothing.
    pub fn release(&mut self, ctx: &mut dyn GraphicsContext) {
        if !self.released {
            ctx.destroy_buffer(self.vertex_buffer);
            self.released = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::{
        camera_state::{
            camera::{Camera, Projection},
            CameraState,
        },
        rendering::graphics_context::recording::RecordingContext,
    };
    use cgmath::Deg;

    fn camera() -> CameraState {
        CameraState::new(
            Camera::new(Point3::new(0.0, 1.0, 0.0), Deg(45.0), Deg(-20.0)),
            Projection::new(640, 480, Deg(60.0), 0.1, 50.0),
        )
    }

    #[test]
    fn test_each_draw_streams_two_vertices() {
        let mut ctx = RecordingContext::new();
        let mut line = DebugLine::new(&mut ctx);
        let camera = camera();

        line.draw(
            &mut ctx,
            &camera,
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 3.0),
            [255, 10, 20],
            3.0,
        )
        .unwrap();
        line.draw(
            &mut ctx,
            &camera,
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(4.0, 4.0, 4.0),
            [0, 0, 255],
            1.0,
        )
        .unwrap();

        let handle = ctx.draws[0].vertex_buffer;
        assert_eq!(ctx.uploads(handle), 2);
        assert_eq!(ctx.buffers[&handle].last_hint, Some(UsageHint::Stream));

        let vertices: Vec<LineVertex> = ctx.contents(handle);
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[1].position, [4.0, 4.0, 4.0]);
        assert!(vertices.iter().all(|v| v.color == [0, 0, 255, 255]));
    }

    #[test]
    fn test_thickness_is_scoped_to_each_draw() {
        let mut ctx = RecordingContext::new();
        let mut line = DebugLine::new(&mut ctx);
        let camera = camera();
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(0.0, 1.0, 0.0);

        line.draw(&mut ctx, &camera, a, b, [1, 2, 3], 5.0).unwrap();
        line.draw(&mut ctx, &camera, a, b, [1, 2, 3], 1.0).unwrap();

        assert_eq!(ctx.draws[0].line_width, 5.0);
        assert_eq!(ctx.draws[1].line_width, 1.0);
        assert!(ctx.draws.iter().all(|d| d.index_buffer.is_none()));
        assert!(ctx.draws.iter().all(|d| d.element_count == 2));
        assert!(ctx.draws.iter().all(|d| d.pipeline == PipelineKind::Line));
    }

    #[test]
    fn test_release_frees_buffer_once() {
        let mut ctx = RecordingContext::new();
        let mut line = DebugLine::new(&mut ctx);
        line.release(&mut ctx);
        line.release(&mut ctx);
        assert_eq!(ctx.destroyed.len(), 1);
    }

    #[test]
    fn test_draw_after_release_is_rejected() {
        let mut ctx = RecordingContext::new();
        let mut line = DebugLine::new(&mut ctx);
        line.release(&mut ctx);

        let err = line
            .draw(
                &mut ctx,
                &camera(),
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 1.0),
                [255, 255, 255],
                1.0,
            )
            .unwrap_err();
        assert!(matches!(err, RenderError::UseAfterRelease));
        assert_eq!(ctx.total_uploads(), 0);
        assert!(ctx.draws.is_empty());
    }
}
