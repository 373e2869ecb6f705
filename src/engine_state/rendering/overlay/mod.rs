//! Overlay primitives drawn on top of the scene: the wireframe selection box and
//! debug lines.

mod debug_line;
mod wireframe_box;

pub use debug_line::DebugLine;
pub use wireframe_box::{WireframeBox, WIREFRAME_CUBE_INDICES, WIREFRAME_CUBE_VERTICES};
