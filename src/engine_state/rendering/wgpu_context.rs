//! # wgpu Graphics Context
//!
//! The production [`GraphicsContext`]. Buffers live in a [`BufferState`]; draws are
//! recorded as they are submitted and replayed in order by [`WgpuContext::flush`] inside
//! a single render pass.
//!
//! ## Uniforms
//!
//! Every recorded draw gets its own slot in one uniform buffer, bound with a dynamic
//! offset. The buffer grows to the next power of two when a frame records more draws than
//! it holds. Uniforms are staged with `Queue::write_buffer`, so `flush` must be called at
//! most once per `Queue::submit`.
//!
//! ## Buffer reuse
//!
//! A buffer read by a draw stays in use from `submit_draw` until the flush after the one
//! that encoded the draw. Uploads made between `flush` and `Queue::submit` therefore orphan
//! instead of overwriting storage the encoded pass still reads.
//!
//! ## Errors
//!
//! Errors wgpu raises asynchronously are captured through `Device::on_uncaptured_error`
//! and handed out by [`GraphicsContext::poll_error`] after the ones the context detected
//! itself.

use std::{
    collections::{HashSet, VecDeque},
    sync::{Arc, Mutex},
};

use wgpu::{BindGroup, BindGroupLayout, Buffer, Device, Queue, RenderPipeline};

use crate::{
    core::{GpuError, RenderConfig},
    engine_state::{
        buffer_state::BufferState,
        rendering::{
            graphics_context::{
                BufferHandle, BufferKind, DrawCall, DrawUniforms, GraphicsContext, PipelineKind,
                UsageHint,
            },
            vertex::{position_desc, BlockVertex, LineVertex},
        },
    },
};

const OVERLAY_SHADER: &str = include_str!("../../../shaders/overlay.wgsl");

const UNIFORM_SIZE: u64 = std::mem::size_of::<DrawUniforms>() as u64;

/// A draw waiting for the next flush. Holds its own buffer references so later uploads
/// can orphan the storage without affecting it.
struct PendingDraw {
    pipeline: PipelineKind,
    vertex_buffer: Buffer,
    index_buffer: Option<Buffer>,
    element_count: u32,
    uniforms: DrawUniforms,
}

/// Buffers read by recorded or last-flushed draws.
#[derive(Debug, Default)]
struct InUseBuffers {
    pending: HashSet<BufferHandle>,
    flushed: HashSet<BufferHandle>,
}

impl InUseBuffers {
    fn mark(&mut self, handle: BufferHandle) {
        self.pending.insert(handle);
    }

    fn contains(&self, handle: BufferHandle) -> bool {
        self.pending.contains(&handle) || self.flushed.contains(&handle)
    }

    fn forget(&mut self, handle: BufferHandle) {
        self.pending.remove(&handle);
        self.flushed.remove(&handle);
    }

    /// Pending draws were encoded; the previous batch has been submitted by now.
    fn flush(&mut self) {
        self.flushed = std::mem::take(&mut self.pending);
    }
}

/// Rounds `value` up to a multiple of `alignment`.
fn align_to(value: u64, alignment: u64) -> u64 {
    value.div_ceil(alignment) * alignment
}

/// Slot capacity needed to hold `required` draws, starting from `current`.
fn grown_capacity(current: u32, required: u32) -> u32 {
    if required <= current {
        current
    } else {
        required.next_power_of_two()
    }
}

/// Renders overlays through wgpu.
pub struct WgpuContext {
    device: Device,
    queue: Queue,
    buffer_state: BufferState,
    block_pipeline: RenderPipeline,
    wireframe_pipeline: RenderPipeline,
    line_pipeline: RenderPipeline,
    uniform_layout: BindGroupLayout,
    uniform_buffer: Buffer,
    uniform_bind_group: BindGroup,
    uniform_stride: u64,
    uniform_capacity: u32,
    pending: Vec<PendingDraw>,
    in_use: InUseBuffers,
    errors: VecDeque<GpuError>,
    uncaptured: Arc<Mutex<VecDeque<GpuError>>>,
    warned_line_width: bool,
}

impl WgpuContext {
    /// Creates the context, its pipelines and the uniform ring.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `queue` - The queue uploads are staged on
    /// * `color_format` - Format of the views passed to [`Self::flush`]
    /// * `depth_stencil` - Depth state of every pipeline; `flush` must then get a depth view
    /// * `config` - Supplies the initial uniform capacity
    pub fn new(
        device: Device,
        queue: Queue,
        color_format: wgpu::TextureFormat,
        depth_stencil: Option<wgpu::DepthStencilState>,
        config: &RenderConfig,
    ) -> Self {
        let uncaptured = Arc::new(Mutex::new(VecDeque::new()));
        let sink = Arc::clone(&uncaptured);
        device.on_uncaptured_error(Box::new(move |err| {
            if let Ok(mut queue) = sink.lock() {
                queue.push_back(GpuError::from_wgpu(&err));
            }
        }));

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(UNIFORM_SIZE),
                },
                count: None,
            }],
            label: Some("Overlay Uniform Bind Group Layout"),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Overlay Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Overlay Shader"),
            source: wgpu::ShaderSource::Wgsl(OVERLAY_SHADER.into()),
        });

        let pipeline = |label: &str,
                        entry_point: &str,
                        buffers: &[wgpu::VertexBufferLayout],
                        topology: wgpu::PrimitiveTopology,
                        cull_mode: Option<wgpu::Face>| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(entry_point),
                    compilation_options: Default::default(),
                    buffers,
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_color"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: color_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: depth_stencil.clone(),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        };

        let block_pipeline = pipeline(
            "Reference Block Pipeline",
            "vs_block",
            &[BlockVertex::desc()],
            wgpu::PrimitiveTopology::TriangleList,
            Some(wgpu::Face::Back),
        );
        let wireframe_pipeline = pipeline(
            "Wireframe Pipeline",
            "vs_wireframe",
            &[position_desc()],
            wgpu::PrimitiveTopology::LineList,
            None,
        );
        let line_pipeline = pipeline(
            "Debug Line Pipeline",
            "vs_line",
            &[LineVertex::desc()],
            wgpu::PrimitiveTopology::LineList,
            None,
        );

        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let uniform_stride = align_to(UNIFORM_SIZE, alignment);
        let uniform_capacity = config.initial_draw_capacity.max(1);
        let (uniform_buffer, uniform_bind_group) =
            Self::create_uniform_ring(&device, &uniform_layout, uniform_stride, uniform_capacity);

        log::info!(
            "Overlay context created: {:?} target, depth {}, uniform stride {} bytes",
            color_format,
            if depth_stencil.is_some() { "on" } else { "off" },
            uniform_stride
        );

        Self {
            buffer_state: BufferState::new(device.clone(), queue.clone()),
            device,
            queue,
            block_pipeline,
            wireframe_pipeline,
            line_pipeline,
            uniform_layout,
            uniform_buffer,
            uniform_bind_group,
            uniform_stride,
            uniform_capacity,
            pending: Vec::new(),
            in_use: InUseBuffers::default(),
            errors: VecDeque::new(),
            uncaptured,
            warned_line_width: false,
        }
    }

    fn create_uniform_ring(
        device: &Device,
        layout: &BindGroupLayout,
        stride: u64,
        capacity: u32,
    ) -> (Buffer, BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Overlay Uniform Buffer"),
            size: stride * u64::from(capacity),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(UNIFORM_SIZE),
                }),
            }],
            label: Some("Overlay Uniform Bind Group"),
        });

        (buffer, bind_group)
    }

    fn pipeline(&self, kind: PipelineKind) -> &RenderPipeline {
        match kind {
            PipelineKind::Block => &self.block_pipeline,
            PipelineKind::Wireframe => &self.wireframe_pipeline,
            PipelineKind::Line => &self.line_pipeline,
        }
    }

    fn stored_buffer(&mut self, handle: BufferHandle) -> Option<Buffer> {
        let buffer = self.buffer_state.get_buffer(handle).cloned();
        if buffer.is_none() {
            self.errors.push_back(GpuError::InvalidOperation(format!(
                "draw references buffer {:?} with no storage",
                handle
            )));
        }
        buffer
    }

    /// Encodes every recorded draw into one render pass over `target`.
    ///
    /// The pass loads the existing contents, so overlays land on top of the scene.
    ///
    /// # Arguments
    /// * `encoder` - Encoder the pass is recorded into
    /// * `target` - Color view in the format the context was created with
    /// * `depth` - Depth view; required when the context was created with depth state
    ///
    /// # Returns
    /// The number of draws encoded
    pub fn flush(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        depth: Option<&wgpu::TextureView>,
    ) -> usize {
        let draws = std::mem::take(&mut self.pending);
        self.in_use.flush();
        if draws.is_empty() {
            return 0;
        }

        let required = u32::try_from(draws.len()).unwrap_or(u32::MAX);
        let capacity = grown_capacity(self.uniform_capacity, required);
        if capacity != self.uniform_capacity {
            log::debug!(
                "Growing overlay uniform ring from {} to {} draws",
                self.uniform_capacity,
                capacity
            );
            let (buffer, bind_group) = Self::create_uniform_ring(
                &self.device,
                &self.uniform_layout,
                self.uniform_stride,
                capacity,
            );
            self.uniform_buffer = buffer;
            self.uniform_bind_group = bind_group;
            self.uniform_capacity = capacity;
        }

        let stride = self.uniform_stride as usize;
        let mut staging = vec![0u8; stride * draws.len()];
        for (slot, draw) in staging.chunks_exact_mut(stride).zip(&draws) {
            slot[..UNIFORM_SIZE as usize].copy_from_slice(bytemuck::bytes_of(&draw.uniforms));
        }
        self.queue.write_buffer(&self.uniform_buffer, 0, &staging);

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Overlay Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: depth.map(|view| wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        for (slot, draw) in draws.iter().enumerate() {
            let offset = (slot * stride) as wgpu::DynamicOffset;
            render_pass.set_pipeline(self.pipeline(draw.pipeline));
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
            render_pass.set_vertex_buffer(0, draw.vertex_buffer.slice(..));

            match &draw.index_buffer {
                Some(index_buffer) => {
                    render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..draw.element_count, 0, 0..1);
                }
                None => render_pass.draw(0..draw.element_count, 0..1),
            }
        }

        draws.len()
    }

    /// Queues a surface acquisition failure so it is reported like any other GPU error.
    pub fn report_surface_error(&mut self, err: &wgpu::SurfaceError) {
        self.errors.push_back(GpuError::from_surface(err));
    }

    /// Draws recorded since the last flush.
    pub fn pending_draws(&self) -> usize {
        self.pending.len()
    }

    /// The buffer registry, for analytics.
    pub fn buffer_state(&self) -> &BufferState {
        &self.buffer_state
    }
}

impl GraphicsContext for WgpuContext {
    fn create_buffer(&mut self, label: &str, kind: BufferKind) -> BufferHandle {
        self.buffer_state.create_buffer(label, kind)
    }

    fn upload(&mut self, handle: BufferHandle, data: &[u8], hint: UsageHint) {
        let in_use = self.in_use.contains(handle);
        if let Err(err) = self.buffer_state.write_buffer(handle, data, hint, in_use) {
            self.errors.push_back(err);
        }
    }

    fn destroy_buffer(&mut self, handle: BufferHandle) {
        self.in_use.forget(handle);
        self.buffer_state.destroy_buffer(handle);
    }

    fn submit_draw(&mut self, draw: DrawCall) {
        if draw.element_count == 0 {
            return;
        }
        if draw.line_width != 1.0 && !self.warned_line_width {
            log::debug!(
                "Line width {} requested; wgpu rasterizes lines at 1px",
                draw.line_width
            );
            self.warned_line_width = true;
        }

        let Some(vertex_buffer) = self.stored_buffer(draw.vertex_buffer) else {
            return;
        };
        let index_buffer = match draw.index_buffer {
            Some(handle) => match self.stored_buffer(handle) {
                Some(buffer) => Some(buffer),
                None => return,
            },
            None => None,
        };

        self.in_use.mark(draw.vertex_buffer);
        if let Some(handle) = draw.index_buffer {
            self.in_use.mark(handle);
        }
        self.pending.push(PendingDraw {
            pipeline: draw.pipeline,
            vertex_buffer,
            index_buffer,
            element_count: draw.element_count,
            uniforms: draw.uniforms,
        });
    }

    fn poll_error(&mut self) -> Option<GpuError> {
        if let Some(err) = self.errors.pop_front() {
            return Some(err);
        }
        self.uncaptured.lock().ok()?.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_stride_alignment() {
        assert_eq!(align_to(UNIFORM_SIZE, 256), 256);
        assert_eq!(align_to(UNIFORM_SIZE, 32), 96);
        assert_eq!(align_to(UNIFORM_SIZE, 64), 128);
    }

    #[test]
    fn test_capacity_growth() {
        assert_eq!(grown_capacity(64, 10), 64);
        assert_eq!(grown_capacity(64, 64), 64);
        assert_eq!(grown_capacity(64, 65), 128);
        assert_eq!(grown_capacity(1, 300), 512);
    }

    #[test]
    fn test_flushed_buffers_stay_in_use_until_next_flush() {
        let a = BufferHandle::from_raw(0);
        let b = BufferHandle::from_raw(1);
        let mut in_use = InUseBuffers::default();

        in_use.mark(a);
        assert!(in_use.contains(a));

        in_use.flush();
        assert!(in_use.contains(a));

        in_use.mark(b);
        in_use.flush();
        assert!(!in_use.contains(a));
        assert!(in_use.contains(b));

        in_use.flush();
        assert!(!in_use.contains(b));
    }

    #[test]
    fn test_destroyed_buffer_is_forgotten() {
        let a = BufferHandle::from_raw(3);
        let mut in_use = InUseBuffers::default();
        in_use.mark(a);
        in_use.flush();
        in_use.mark(a);
        in_use.forget(a);
        assert!(!in_use.contains(a));
    }

    #[test]
    fn test_shader_declares_every_entry_point() {
        for entry in ["vs_block", "vs_wireframe", "vs_line", "fs_color"] {
            assert!(OVERLAY_SHADER.contains(&format!("fn {entry}(")));
        }
    }
}
