//! A vertex/index buffer pair living on the GPU.
//!
//! Buffers are allocated lazily on the first upload and freed by an explicit
//! [`MeshBuffer::release`]. Releasing twice is a programmer error and is reported
//! instead of freeing the same handles again.

use bytemuck::NoUninit;

use crate::{
    core::{RenderError, Result},
    engine_state::rendering::{
        graphics_context::{check_gpu_errors, BufferKind, GraphicsContext, UsageHint},
        BlockVertex, BufferHandle,
    },
};

/// Lifecycle of a [`MeshBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshBufferState {
    /// Nothing uploaded yet
    Unallocated,
    /// Both buffers exist
    Live {
        /// Vertex buffer handle
        vertex_buffer: BufferHandle,
        /// Index buffer handle
        index_buffer: BufferHandle,
    },
    /// Freed; no further uploads allowed
    Released,
}

/// GPU storage for one indexed mesh.
#[derive(Debug)]
pub struct MeshBuffer {
    label: String,
    state: MeshBufferState,
    index_count: u32,
    hint: UsageHint,
}

impl MeshBuffer {
    /// Creates an unallocated mesh buffer.
    ///
    /// # Arguments
    /// * `label` - Debug label prefix for the GPU buffers
    /// * `hint` - How often the contents are expected to change
    pub fn new(label: impl Into<String>, hint: UsageHint) -> Self {
        Self {
            label: label.into(),
            state: MeshBufferState::Unallocated,
            index_count: 0,
            hint,
        }
    }

    /// Uploads interleaved block vertices and their indices.
    pub fn upload_blocks(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        vertices: &[BlockVertex],
        indices: &[u32],
    ) -> Result<()> {
        self.upload(ctx, vertices, indices)
    }

    /// Uploads position-only vertices and their indices.
    pub fn upload_positions(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        positions: &[[f32; 3]],
        indices: &[u32],
    ) -> Result<()> {
        self.upload(ctx, positions, indices)
    }

    /// Replaces both buffers' contents, allocating them on first use.
    ///
    /// # Returns
    /// `RenderError::UseAfterRelease` after [`MeshBuffer::release`], or the
    /// out-of-memory error drained from the context
    pub fn upload<V: NoUninit>(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        vertices: &[V],
        indices: &[u32],
    ) -> Result<()> {
        let (vertex_buffer, index_buffer) = match self.state {
            MeshBufferState::Released => return Err(RenderError::UseAfterRelease),
            MeshBufferState::Live {
                vertex_buffer,
                index_buffer,
            } => (vertex_buffer, index_buffer),
            MeshBufferState::Unallocated => {
                let vertex_buffer =
                    ctx.create_buffer(&format!("{} Vertex Buffer", self.label), BufferKind::Vertex);
                let index_buffer =
                    ctx.create_buffer(&format!("{} Index Buffer", self.label), BufferKind::Index);
                self.state = MeshBufferState::Live {
                    vertex_buffer,
                    index_buffer,
                };
                (vertex_buffer, index_buffer)
            }
        };

        ctx.upload(vertex_buffer, bytemuck::cast_slice(vertices), self.hint);
        ctx.upload(index_buffer, bytemuck::cast_slice(indices), self.hint);
        self.index_count = indices.len() as u32;

        check_gpu_errors(ctx)?;
        Ok(())
    }

    /// Frees both buffers.
    ///
    /// Releasing a never-uploaded buffer only marks it released.
    ///
    /// # Returns
    /// `RenderError::DoubleRelease` if the buffer was already released
    pub fn release(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        match std::mem::replace(&mut self.state, MeshBufferState::Released) {
            MeshBufferState::Released => Err(RenderError::DoubleRelease),
            MeshBufferState::Unallocated => Ok(()),
            MeshBufferState::Live {
                vertex_buffer,
                index_buffer,
            } => {
                ctx.destroy_buffer(vertex_buffer);
                ctx.destroy_buffer(index_buffer);
                self.index_count = 0;
                Ok(())
            }
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> MeshBufferState {
        self.state
    }

    /// The buffer handles, if allocated.
    pub fn handles(&self) -> Option<(BufferHandle, BufferHandle)> {
        match self.state {
            MeshBufferState::Live {
                vertex_buffer,
                index_buffer,
            } => Some((vertex_buffer, index_buffer)),
            _ => None,
        }
    }

    /// Number of indices from the last upload.
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Whether a draw from this buffer would produce anything.
    pub fn is_drawable(&self) -> bool {
        self.handles().is_some() && self.index_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::GpuError, engine_state::rendering::graphics_context::recording::RecordingContext};

    #[test]
    fn test_first_upload_allocates() {
        let mut ctx = RecordingContext::new();
        let mut mesh = MeshBuffer::new("Test", UsageHint::Static);
        assert_eq!(mesh.state(), MeshBufferState::Unallocated);

        mesh.upload_positions(&mut ctx, &[[0.0; 3]; 4], &[0, 1, 2, 2, 3, 0])
            .unwrap();
        let (vb, ib) = mesh.handles().unwrap();
        assert_eq!(mesh.index_count(), 6);
        assert_eq!(ctx.uploads(vb), 1);
        assert_eq!(ctx.uploads(ib), 1);
        assert_eq!(ctx.buffers[&vb].kind, BufferKind::Vertex);
        assert_eq!(ctx.buffers[&ib].kind, BufferKind::Index);
        assert_eq!(ctx.contents::<u32>(ib), vec![0, 1, 2, 2, 3, 0]);

        mesh.upload_positions(&mut ctx, &[[1.0; 3]; 4], &[0, 1, 2])
            .unwrap();
        assert_eq!(mesh.handles(), Some((vb, ib)));
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(ctx.live_buffers(), 2);
    }

    #[test]
    fn test_empty_upload_keeps_handle_valid() {
        let mut ctx = RecordingContext::new();
        let mut mesh = MeshBuffer::new("Empty", UsageHint::Static);
        mesh.upload_blocks(&mut ctx, &[], &[]).unwrap();
        assert!(mesh.handles().is_some());
        assert_eq!(mesh.index_count(), 0);
        assert!(!mesh.is_drawable());
    }

    #[test]
    fn test_release_frees_buffers_once() {
        let mut ctx = RecordingContext::new();
        let mut mesh = MeshBuffer::new("Test", UsageHint::Static);
        mesh.upload_positions(&mut ctx, &[[0.0; 3]], &[0]).unwrap();

        mesh.release(&mut ctx).unwrap();
        assert_eq!(ctx.destroyed.len(), 2);
        assert_eq!(ctx.live_buffers(), 0);

        assert!(matches!(mesh.release(&mut ctx), Err(RenderError::DoubleRelease)));
        assert_eq!(ctx.destroyed.len(), 2);
    }

    #[test]
    fn test_release_without_upload_is_noop() {
        let mut ctx = RecordingContext::new();
        let mut mesh = MeshBuffer::new("Test", UsageHint::Static);
        mesh.release(&mut ctx).unwrap();
        assert!(ctx.destroyed.is_empty());
        assert_eq!(mesh.state(), MeshBufferState::Released);
    }

    #[test]
    fn test_upload_after_release_fails() {
        let mut ctx = RecordingContext::new();
        let mut mesh = MeshBuffer::new("Test", UsageHint::Static);
        mesh.release(&mut ctx).unwrap();
        assert!(matches!(
            mesh.upload_positions(&mut ctx, &[[0.0; 3]], &[0]),
            Err(RenderError::UseAfterRelease)
        ));
    }

    #[test]
    fn test_out_of_memory_is_surfaced() {
        let mut ctx = RecordingContext::new();
        let mut mesh = MeshBuffer::new("Test", UsageHint::Static);
        ctx.fail_next_upload(GpuError::OutOfMemory);
        assert!(matches!(
            mesh.upload_positions(&mut ctx, &[[0.0; 3]], &[0]),
            Err(RenderError::Gpu(GpuError::OutOfMemory))
        ));
    }

    #[test]
    fn test_other_gpu_errors_are_logged_only() {
        let mut ctx = RecordingContext::new();
        let mut mesh = MeshBuffer::new("Test", UsageHint::Static);
        ctx.fail_next_upload(GpuError::InvalidArgument("size".to_string()));
        mesh.upload_positions(&mut ctx, &[[0.0; 3]], &[0]).unwrap();
        assert!(ctx.errors.is_empty());
    }
}
