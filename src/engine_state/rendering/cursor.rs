//! # Reference Cursor
//!
//! The preview drawn where the next placement would land. Without an active brush it
//! is a single translucent cube. With one it is the meshed brush.
//!
//! ## Caching
//!
//! The cursor remembers the grid position and mode it last uploaded. Redrawing at the
//! same truncated position in the same mode binds the existing buffers and uploads
//! nothing. When the position changes in brushed mode the cached brush vertices are
//! shifted by the difference; the brush is never remeshed for a move.

use cgmath::{InnerSpace, Point3, Vector3};
use log::debug;

use crate::{
    core::{RenderError, Result},
    engine_state::{
        camera_state::{camera_relative_transform, CameraView},
        rendering::{
            graphics_context::{check_gpu_errors, DrawCall, DrawUniforms, GraphicsContext, PipelineKind, UsageHint},
            meshing::{
                mesh::{mesh_brush, BrushMesh, CubeTemplate},
                MeshBuffer,
            },
            BlockVertex,
        },
        voxels::VoxelGrid,
    },
};

/// What the cursor shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    /// The single reference cube
    Simple,
    /// The meshed brush
    Brushed,
}

#[derive(Debug)]
struct CachedBrush {
    mesh: BrushMesh,
    /// Grid position the mesh vertices currently sit at
    origin: Point3<i32>,
}

/// Cached cursor geometry and the GPU buffer it is drawn from.
#[derive(Debug)]
pub struct ReferenceCursor {
    template: CubeTemplate,
    cube_indices: Vec<u32>,
    brush: Option<CachedBrush>,
    last_drawn: Option<(CursorMode, Point3<i32>)>,
    dirty: bool,
    mesh_buffer: MeshBuffer,
}

/// Truncates each coordinate towards zero.
///
/// Returns `None` when a coordinate is not finite or truncates outside the `i32` range.
pub fn grid_position(position: Point3<f32>) -> Option<Point3<i32>> {
    let cell = |c: f32| {
        let t = c.trunc();
        (t.is_finite() && t >= i32::MIN as f32 && t < i32::MAX as f32).then_some(t as i32)
    };
    Some(Point3::new(cell(position.x)?, cell(position.y)?, cell(position.z)?))
}

fn to_vector(p: Point3<i32>) -> Vector3<f32> {
    Vector3::new(p.x as f32, p.y as f32, p.z as f32)
}

/// Offset from one cell to another. Widened so opposite ends of the grid range don't overflow.
fn cell_delta(from: Point3<i32>, to: Point3<i32>) -> Vector3<f32> {
    let axis = |a: i32, b: i32| (i64::from(b) - i64::from(a)) as f32;
    Vector3::new(axis(from.x, to.x), axis(from.y, to.y), axis(from.z, to.z))
}

impl ReferenceCursor {
    /// Creates a cursor whose reference cube has the given RGBA color.
    pub fn new(reference_color: [u8; 4]) -> Self {
        Self {
            template: CubeTemplate::with_color(reference_color),
            cube_indices: CubeTemplate::indices(),
            brush: None,
            last_drawn: None,
            dirty: false,
            mesh_buffer: MeshBuffer::new("Reference Cursor", UsageHint::Static),
        }
    }

    /// Meshes a new brush, replacing any previous one.
    ///
    /// The mesh is built in brush-local space with the current reference color, and the
    /// next draw uploads it regardless of position.
    pub fn mesh_brush(&mut self, grid: &VoxelGrid) -> &BrushMesh {
        let mesh = mesh_brush(grid, &self.template);
        self.dirty = true;
        let cached = self.brush.insert(CachedBrush {
            mesh,
            origin: Point3::new(0, 0, 0),
        });
        &cached.mesh
    }

    /// Changes the reference cube color.
    ///
    /// An already meshed brush keeps its colors.
    pub fn set_reference_color(&mut self, rgba: [u8; 4]) {
        self.template = CubeTemplate::with_color(rgba);
        if matches!(self.last_drawn, Some((CursorMode::Simple, _))) {
            self.dirty = true;
        }
    }

    /// Current reference cube color.
    pub fn reference_color(&self) -> [u8; 4] {
        self.template.color()
    }

    /// The cached brush mesh at its current position, if a brush was meshed.
    pub fn brush_mesh(&self) -> Option<&BrushMesh> {
        self.brush.as_ref().map(|b| &b.mesh)
    }

    /// Mode and grid position of the last upload.
    pub fn last_drawn(&self) -> Option<(CursorMode, Point3<i32>)> {
        self.last_drawn
    }

    /// The buffer the cursor is drawn from.
    pub fn mesh_buffer(&self) -> &MeshBuffer {
        &self.mesh_buffer
    }

    /// Draws the cursor at `position`.
    ///
    /// # Arguments
    /// * `ctx` - Graphics context to upload to and record the draw on
    /// * `camera` - Camera the cursor is viewed from
    /// * `position` - Target position; compared and placed by its truncated components
    /// * `brush_active` - Draw the meshed brush instead of the reference cube
    ///
    /// # Returns
    /// `RenderError::BrushNotMeshed` for a brushed draw before [`Self::mesh_brush`],
    /// `RenderError::PositionOutOfRange` when `position` has no grid cell, or any error
    /// from uploading
    pub fn draw(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        camera: &dyn CameraView,
        position: Point3<f32>,
        brush_active: bool,
    ) -> Result<()> {
        let mode = if brush_active {
            CursorMode::Brushed
        } else {
            CursorMode::Simple
        };
        let target = grid_position(position)
            .ok_or(RenderError::PositionOutOfRange([position.x, position.y, position.z]))?;

        if self.dirty || self.last_drawn != Some((mode, target)) {
            self.rebuild(ctx, mode, target)?;
        }

        let Some((vertex_buffer, index_buffer)) = self.mesh_buffer.handles() else {
            return Ok(());
        };
        if self.mesh_buffer.index_count() == 0 {
            return Ok(());
        }

        let light = Vector3::new(position.x, position.y, position.z);
        let light = if light.magnitude2() > 0.0 {
            light / light.magnitude()
        } else {
            Vector3::unit_y()
        };

        ctx.submit_draw(DrawCall {
            pipeline: PipelineKind::Block,
            vertex_buffer,
            index_buffer: Some(index_buffer),
            element_count: self.mesh_buffer.index_count(),
            uniforms: DrawUniforms::new(camera_relative_transform(camera)).with_light(light),
            line_width: 1.0,
        });
        check_gpu_errors(ctx)?;
        Ok(())
    }

    fn rebuild(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        mode: CursorMode,
        target: Point3<i32>,
    ) -> Result<()> {
        match mode {
            CursorMode::Simple => {
                let offset = to_vector(target);
                let vertices: Vec<BlockVertex> = self
                    .template
                    .vertices()
                    .iter()
                    .map(|vertex| vertex.translated(offset))
                    .collect();
                self.mesh_buffer
                    .upload_blocks(ctx, &vertices, &self.cube_indices)?;
            }
            CursorMode::Brushed => {
                let brush = self.brush.as_mut().ok_or(RenderError::BrushNotMeshed)?;
                brush.mesh.translate(cell_delta(brush.origin, target));
                brush.origin = target;
                self.mesh_buffer
                    .upload_blocks(ctx, &brush.mesh.vertices, &brush.mesh.indices)?;
            }
        }

        debug!("Reference cursor uploaded in {:?} mode at {:?}", mode, target);
        self.last_drawn = Some((mode, target));
        self.dirty = false;
        Ok(())
    }

    /// Frees the cursor's GPU buffers.
    pub fn release(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        self.mesh_buffer.release(ctx)
    }
}
