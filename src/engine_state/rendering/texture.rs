//! Render target textures.
//!
//! Overlays are drawn into whatever color and depth views the caller passes to
//! [`super::WgpuContext::flush`]. This module creates offscreen ones for headless use.

/// A texture and the view render passes attach.
pub struct Texture {
    /// The underlying texture
    pub texture: wgpu::Texture,
    /// Default view of the whole texture
    pub view: wgpu::TextureView,
}

impl Texture {
    /// Depth format the overlay pipelines are built with when depth testing is on.
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a depth texture for depth testing overlays against.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `width`, `height` - Size in pixels
    /// * `label` - Debug label
    pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32, label: &str) -> Self {
        Self::create(device, width, height, Self::DEPTH_FORMAT, label)
    }

    /// Creates a color texture usable as a render attachment and copy source.
    pub fn create_color_target(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        label: &str,
    ) -> Self {
        Self::create(device, width, height, format, label)
    }

    fn create(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        };

        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { texture, view }
    }

    /// Depth-stencil state matching [`Self::DEPTH_FORMAT`].
    ///
    /// Overlays test against depth but never write it, so they do not occlude each other.
    pub fn overlay_depth_state() -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format: Self::DEPTH_FORMAT,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }
}
