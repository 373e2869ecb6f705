//! Brush meshing and the GPU-side mesh resource.
//!
//! # Architecture
//! - `mesh/`: CPU mesh generation (face templates, culling mesher)
//! - `MeshBuffer`: a vertex/index buffer pair with an explicit release

pub mod mesh;
mod mesh_buffer;

pub use mesh_buffer::{MeshBuffer, MeshBufferState};
