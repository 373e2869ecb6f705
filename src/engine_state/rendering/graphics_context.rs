//! # Graphics Context
//!
//! The boundary between the renderer and the GPU. Cursor, overlays and mesh buffers
//! only talk to a [`GraphicsContext`]: they create buffers, replace their contents,
//! record draw calls and poll for errors. [`super::WgpuContext`] is the production
//! implementation.
//!
//! ## Error model
//!
//! Uploads and draws never fail synchronously. The context queues any error it
//! observes and [`check_gpu_errors`] drains the queue after an operation, logging
//! every error and returning only [`GpuError::OutOfMemory`] to the caller.

use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::core::GpuError;

/// Opaque id of a buffer owned by a graphics context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(u32);

impl BufferHandle {
    /// Wraps a raw id. Only graphics contexts hand these out.
    pub fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// The raw id.
    pub fn id(self) -> u32 {
        self.0
    }
}

/// What a buffer is bound as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Vertex data
    Vertex,
    /// `u32` index data
    Index,
}

/// How often a buffer's contents are replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageHint {
    /// Rewritten only when the cached geometry changes
    Static,
    /// Rewritten on every draw; previous storage is orphaned
    Stream,
}

/// The overlay program variant a draw uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    /// Lit, indexed triangles of `BlockVertex`
    Block,
    /// Indexed line list of `[f32; 3]` positions in a flat color
    Wireframe,
    /// Non-indexed line list of `LineVertex`
    Line,
}

/// Per-draw shader inputs.
///
/// # Memory Layout
/// - Transform: 4x4 f32, column major (64 bytes)
/// - Light direction: vec4 f32, w unused (16 bytes)
/// - Color: vec4 f32 RGBA in 0..1 (16 bytes)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniforms {
    /// Model-view-projection matrix
    pub transform: [[f32; 4]; 4],
    /// Direction towards the light
    pub light_direction: [f32; 4],
    /// Flat color used by the wireframe program
    pub color: [f32; 4],
}

impl DrawUniforms {
    /// Uniforms with the given transform, no light and opaque white.
    pub fn new(transform: Matrix4<f32>) -> Self {
        Self {
            transform: transform.into(),
            light_direction: [0.0, 1.0, 0.0, 0.0],
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    /// Sets the light direction.
    pub fn with_light(mut self, direction: Vector3<f32>) -> Self {
        self.light_direction = [direction.x, direction.y, direction.z, 0.0];
        self
    }

    /// Sets the flat color, RGBA in `0.0..=1.0`.
    pub fn with_color(mut self, rgba: [f32; 4]) -> Self {
        self.color = rgba;
        self
    }
}

impl Default for DrawUniforms {
    fn default() -> Self {
        Self::new(Matrix4::identity())
    }
}

/// One recorded draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    /// Program variant
    pub pipeline: PipelineKind,
    /// Vertex buffer bound at slot 0
    pub vertex_buffer: BufferHandle,
    /// Index buffer for indexed draws
    pub index_buffer: Option<BufferHandle>,
    /// Index count for indexed draws, vertex count otherwise
    pub element_count: u32,
    /// Shader inputs
    pub uniforms: DrawUniforms,
    /// Rasterized line width, scoped to this draw
    pub line_width: f32,
}

/// A GPU abstraction the renderer draws through.
pub trait GraphicsContext {
    /// Allocates a new, empty buffer.
    fn create_buffer(&mut self, label: &str, kind: BufferKind) -> BufferHandle;

    /// Replaces the whole contents of a buffer.
    ///
    /// Failures are queued and reported by [`GraphicsContext::poll_error`].
    fn upload(&mut self, handle: BufferHandle, data: &[u8], hint: UsageHint);

    /// Frees a buffer. Unknown handles are ignored.
    fn destroy_buffer(&mut self, handle: BufferHandle);

    /// Records a draw. Draws execute in submission order.
    fn submit_draw(&mut self, draw: DrawCall);

    /// Takes the oldest pending error, if any.
    fn poll_error(&mut self) -> Option<GpuError>;
}

/// Drains and logs every pending error.
///
/// # Returns
/// `Err(GpuError::OutOfMemory)` if any drained error was out of memory, `Ok(())`
/// otherwise. Other errors are only logged.
pub fn check_gpu_errors(ctx: &mut dyn GraphicsContext) -> Result<(), GpuError> {
    let mut out_of_memory = false;
    while let Some(err) = ctx.poll_error() {
        log::error!("{}", err.describe());
        out_of_memory |= err == GpuError::OutOfMemory;
    }

    if out_of_memory {
        Err(GpuError::OutOfMemory)
    } else {
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::recording::RecordingContext;
    use super::*;

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<DrawUniforms>(), 96);
    }

    #[test]
    fn test_uniform_builders() {
        let uniforms = DrawUniforms::default()
            .with_color([1.0, 0.0, 0.2, 1.0])
            .with_light(Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(uniforms.color, [1.0, 0.0, 0.2, 1.0]);
        assert_eq!(uniforms.light_direction, [0.0, 0.0, -1.0, 0.0]);
        let identity: [[f32; 4]; 4] = Matrix4::identity().into();
        assert_eq!(uniforms.transform, identity);
    }

    #[test]
    fn test_only_out_of_memory_is_returned() {
        let mut ctx = RecordingContext::new();
        ctx.errors
            .push_back(GpuError::InvalidOperation("bad state".to_string()));
        ctx.errors.push_back(GpuError::Unknown("1282".to_string()));
        assert_eq!(check_gpu_errors(&mut ctx), Ok(()));
        assert!(ctx.errors.is_empty());

        ctx.errors.push_back(GpuError::InvalidArgument("x".to_string()));
        ctx.errors.push_back(GpuError::OutOfMemory);
        assert_eq!(check_gpu_errors(&mut ctx), Err(GpuError::OutOfMemory));
        assert!(ctx.errors.is_empty());
    }

    #[test]
    fn test_upload_to_unknown_buffer_is_reported() {
        let mut ctx = RecordingContext::new();
        ctx.upload(BufferHandle::from_raw(99), &[0; 4], UsageHint::Static);
        assert!(matches!(
            ctx.poll_error(),
            Some(GpuError::InvalidOperation(_))
        ));
    }
}
