//! # Voxel Editor Render Demo
//!
//! Renders a few frames of editor overlays into an offscreen target on a headless
//! device: a random brush as the reference cursor, a selection box and a debug line.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json]
//! ```

use std::error::Error;

use cgmath::{Deg, Point3, Vector3};
use log::info;
use voxel_editor_render::{
    check_gpu_errors, init_logger, Camera, CameraState, EditorRenderer, Projection, RenderConfig,
    Texture, Voxel, VoxelGrid, WgpuContext,
};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;
const FRAMES: usize = 4;
const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

fn random_brush(width: usize, height: usize, length: usize) -> VoxelGrid {
    let mut brush = VoxelGrid::new(width, height, length);
    for z in 0..length {
        for y in 0..height {
            for x in 0..width {
                if fastrand::bool() {
                    brush.set(x, y, z, Voxel::new(fastrand::u8(1..=u8::MAX)));
                }
            }
        }
    }
    brush
}

fn clear(encoder: &mut wgpu::CommandEncoder, color: &Texture, depth: &Texture) {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Clear Pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: &color.view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color {
                    r: 0.1,
                    g: 0.2,
                    b: 0.3,
                    a: 1.0,
                }),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: &depth.view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        ..Default::default()
    });
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logger();

    let config = match std::env::args().nth(1) {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::default(),
        force_fallback_adapter: false,
        compatible_surface: None,
    }))?;
    info!("Using adapter {:?}", adapter.get_info());

    let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: Some("Overlay Demo Device"),
        ..Default::default()
    }))?;

    let color_target = Texture::create_color_target(&device, WIDTH, HEIGHT, COLOR_FORMAT, "Demo Color Target");
    let depth_target = Texture::create_depth_texture(&device, WIDTH, HEIGHT, "Demo Depth Target");

    let mut ctx = WgpuContext::new(
        device.clone(),
        queue.clone(),
        COLOR_FORMAT,
        Some(Texture::overlay_depth_state()),
        &config,
    );
    let mut renderer = EditorRenderer::new(&mut ctx, config)?;

    let brush = random_brush(6, 4, 5);
    let mesh = renderer.mesh_brush(&brush);
    info!(
        "Random brush: {} of {} voxels occupied, {} quads",
        brush.occupied_count(),
        brush.len(),
        mesh.quad_count()
    );

    let camera = CameraState::new(
        Camera::new(Point3::new(-6.0, 8.0, -6.0), Deg(45.0), Deg(-35.0)),
        Projection::new(WIDTH, HEIGHT, Deg(60.0), 0.1, 200.0),
    );

    let start = web_time::Instant::now();
    for frame in 0..FRAMES {
        // Two frames per cell, so every other frame hits the upload cache.
        let step = (frame / 2) as f32;
        let cursor = Point3::new(2.0 + step, 0.5, 3.0 + step * 0.5);
        let brush_active = frame < FRAMES - 1;

        renderer.draw_reference_voxel(&mut ctx, &camera, cursor, brush_active)?;
        renderer.draw_wireframe_box(
            &mut ctx,
            &camera,
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(16.0, 8.0, 16.0),
            [1.0, 1.0, 0.0, 1.0],
        )?;
        renderer.draw_line(
            &mut ctx,
            &camera,
            Point3::new(0.0, 0.0, 0.0),
            cursor,
            [255, 0, 0],
            Some(3.0),
        )?;

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Overlay Demo Encoder"),
        });
        clear(&mut encoder, &color_target, &depth_target);
        let draws = ctx.flush(&mut encoder, &color_target.view, Some(&depth_target.view));
        queue.submit(Some(encoder.finish()));
        device.poll(wgpu::PollType::Wait)?;

        check_gpu_errors(&mut ctx)?;
        info!("Frame {} encoded {} draws", frame, draws);
    }
    info!("Rendered {} frames in {:?}", FRAMES, start.elapsed());

    ctx.buffer_state().log_analytics();
    renderer.release(&mut ctx)?;
    Ok(())
}
