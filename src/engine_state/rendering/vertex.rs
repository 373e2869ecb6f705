//! Vertex data structures and layouts for editor rendering.
//!
//! This module defines the vertex formats used by the overlay program and the
//! `wgpu::VertexBufferLayout` each one is drawn with.

use cgmath::{Point3, Vector3};

/// A vertex of a meshed brush or of the reference cube.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Color: 4x u8 RGBA, normalized in the shader (4 bytes)
/// - Normal: 3x f32 (12 bytes)
/// - Padding: f32 (4 bytes)
///
/// Total size: 32 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlockVertex {
    /// Position in brush or world space
    pub position: [f32; 3],
    /// RGBA color
    pub color: [u8; 4],
    /// Outward face normal
    pub normal: [f32; 3],
    _padding: f32,
}

impl BlockVertex {
    /// Creates a new vertex.
    ///
    /// # Arguments
    /// * `position` - Vertex position
    /// * `color` - RGBA color
    /// * `normal` - Outward normal of the face the vertex belongs to
    ///
    /// # Returns
    /// A new `BlockVertex` instance
    pub fn new(position: Point3<f32>, color: [u8; 4], normal: Vector3<f32>) -> Self {
        Self {
            position: position.into(),
            color,
            normal: normal.into(),
            _padding: 0.0,
        }
    }

    /// Returns a copy moved by `delta`. Color and normal are unchanged.
    pub fn translated(mut self, delta: Vector3<f32>) -> Self {
        self.translate(delta);
        self
    }

    /// Moves the vertex in place by `delta`.
    #[inline]
    pub fn translate(&mut self, delta: Vector3<f32>) {
        self.position[0] += delta.x;
        self.position[1] += delta.y;
        self.position[2] += delta.z;
    }

    /// Returns the vertex buffer layout description for the block pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: color (vec4<f32>, from unorm8x4)
    /// - `location = 2`: normal (vec3<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<BlockVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Unorm8x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// A colored line endpoint.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Color: 4x u8 RGBA (4 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    /// Endpoint position in world space
    pub position: [f32; 3],
    /// RGBA color
    pub color: [u8; 4],
}

impl LineVertex {
    /// Creates a line vertex.
    pub fn new(position: Point3<f32>, color: [u8; 4]) -> Self {
        Self {
            position: position.into(),
            color,
        }
    }

    /// Vertex buffer layout for the line pipeline.
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Unorm8x4,
                },
            ],
        }
    }
}

/// Vertex buffer layout for position-only geometry such as the wireframe box.
pub fn position_desc<'a>() -> wgpu::VertexBufferLayout<'a> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    }
}
