//! Face-culling mesher for brushes.
//!
//! Every occupied voxel contributes the faces whose neighbor is empty or outside the
//! grid. Faces between two occupied voxels are never emitted, so the result is exactly
//! the visible outer surface. No faces are merged.

use cgmath::{Point3, Vector3};
use log::info;
use web_time::Instant;

use crate::engine_state::voxels::{BlockSide, VoxelGrid};

use super::{face::CubeTemplate, mesh::BrushMesh};

/// Meshes `grid` in brush-local space.
///
/// # Arguments
/// * `grid` - The voxels to mesh
/// * `template` - Unit cube whose faces are copied for each visible side
///
/// # Returns
/// A mesh with four vertices and six indices per visible face. Cells are visited in
/// `z, y, x` order and faces in `BlockSide::all()` order.
pub fn mesh_brush(grid: &VoxelGrid, template: &CubeTemplate) -> BrushMesh {
    mesh_brush_at(grid, template, Point3::new(0, 0, 0))
}

/// Meshes `grid` with its origin cell placed at `origin`.
pub fn mesh_brush_at(grid: &VoxelGrid, template: &CubeTemplate, origin: Point3<i32>) -> BrushMesh {
    let start = Instant::now();
    let mut mesh = BrushMesh::new();
    let base = Vector3::new(origin.x as f32, origin.y as f32, origin.z as f32);

    for z in 0..grid.length() {
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                if !grid.is_occupied(x, y, z) {
                    continue;
                }
                let cell = Point3::new(x, y, z);
                let offset = base + Vector3::new(x as f32, y as f32, z as f32);
                for side in BlockSide::all() {
                    if !grid.neighbor_occupied(cell, side) {
                        mesh.add_face(template.face(side), offset);
                    }
                }
            }
        }
    }

    mesh.build_indices();

    info!(
        "Meshed {}x{}x{} brush: {} faces in {:?}",
        grid.width(),
        grid.height(),
        grid.length(),
        mesh.quad_count(),
        start.elapsed()
    );

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::Voxel;

    fn template() -> CubeTemplate {
        CubeTemplate::with_color([200, 100, 50, 255])
    }

    fn random_grid(width: usize, height: usize, length: usize, rng: &mut fastrand::Rng) -> VoxelGrid {
        let voxels = (0..width * height * length)
            .map(|_| Voxel::new(if rng.bool() { rng.u8(1..) } else { 0 }))
            .collect();
        VoxelGrid::from_voxels(width, height, length, voxels).unwrap()
    }

    #[test]
    fn test_single_voxel_emits_cube() {
        let grid = VoxelGrid::filled(1, 1, 1, Voxel::new(1));
        let mesh = mesh_brush(&grid, &template());
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
        assert_eq!(mesh.vertices.as_slice(), template().vertices().as_slice());
    }

    #[test]
    fn test_two_voxels_share_hidden_faces() {
        let grid = VoxelGrid::filled(2, 1, 1, Voxel::new(1));
        let mesh = mesh_brush(&grid, &template());
        assert_eq!(mesh.quad_count(), 10);
        assert_eq!(mesh.index_count(), 60);
    }

    #[test]
    fn test_full_cuboid_is_surface_only() {
        for (w, h, l) in [(2, 3, 4), (5, 1, 2), (3, 3, 3)] {
            let grid = VoxelGrid::filled(w, h, l, Voxel::new(7));
            let mesh = mesh_brush(&grid, &template());
            assert_eq!(mesh.quad_count(), 2 * (w * h + h * l + w * l));
        }
    }

    #[test]
    fn test_lone_corner_voxel_emits_all_faces() {
        let mut grid = VoxelGrid::new(3, 4, 5);
        grid.set(0, 0, 0, Voxel::new(1));
        let mesh = mesh_brush(&grid, &template());
        assert_eq!(mesh.quad_count(), 6);
    }

    #[test]
    fn test_front_neighbor_uses_layer_stride() {
        // 3x3x3: a layer is 9 cells, a row plus a column would be 6.
        let mut grid = VoxelGrid::new(3, 3, 3);
        grid.set(0, 0, 0, Voxel::new(1));
        grid.set(0, 0, 1, Voxel::new(1));
        let mesh = mesh_brush(&grid, &template());
        assert_eq!(mesh.quad_count(), 10);

        let front_faces_at_z1 = mesh
            .vertices
            .chunks(4)
            .filter(|quad| quad.iter().all(|v| v.position[2] == 1.0) && quad[0].normal == [0.0, 0.0, 1.0])
            .count();
        assert_eq!(front_faces_at_z1, 0);
    }

    #[test]
    fn test_emission_order_follows_sides() {
        let grid = VoxelGrid::filled(1, 1, 1, Voxel::new(1));
        let mesh = mesh_brush(&grid, &template());
        for (quad, side) in mesh.vertices.chunks(4).zip(BlockSide::all()) {
            assert_eq!(quad[0].normal, Into::<[f32; 3]>::into(side.normal()));
        }
    }

    #[test]
    fn test_empty_grid_produces_nothing() {
        let grid = VoxelGrid::new(4, 4, 4);
        let mesh = mesh_brush(&grid, &template());
        assert!(mesh.is_empty());
        assert_eq!(mesh.index_count(), 0);

        let degenerate = VoxelGrid::new(0, 3, 3);
        assert!(mesh_brush(&degenerate, &template()).is_empty());
    }

    #[test]
    fn test_index_count_matches_vertex_count_for_random_grids() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        for _ in 0..32 {
            let grid = random_grid(rng.usize(1..6), rng.usize(1..6), rng.usize(1..6), &mut rng);
            let mesh = mesh_brush(&grid, &template());
            assert_eq!(mesh.vertex_count() % 4, 0);
            assert_eq!(mesh.index_count(), mesh.vertex_count() / 4 * 6);
            assert!(mesh
                .indices
                .iter()
                .all(|&i| (i as usize) < mesh.vertex_count()));
        }
    }

    #[test]
    fn test_translation_matches_remesh() {
        let mut rng = fastrand::Rng::with_seed(42);
        let grid = random_grid(3, 2, 4, &mut rng);
        let template = template();

        let p1 = Point3::new(2, -1, 5);
        let p2 = Point3::new(-3, 4, 1);
        let at_p1 = mesh_brush_at(&grid, &template, p1);
        let at_p2 = mesh_brush_at(&grid, &template, p2);
        let delta = Vector3::new((p2.x - p1.x) as f32, (p2.y - p1.y) as f32, (p2.z - p1.z) as f32);

        assert_eq!(at_p1.translated(delta), at_p2);
    }
}
