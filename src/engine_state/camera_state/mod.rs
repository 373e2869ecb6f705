//! # Camera State Management
//!
//! The renderer never owns a camera. It reads one through [`CameraView`], which the
//! editor implements for whatever camera it drives. [`CameraState`] is a ready-made
//! implementation pairing a [`camera::Camera`] with a [`camera::Projection`].
//!
//! ## Core Components
//! - `CameraView`: world position plus camera-relative view and projection matrices
//! - `Camera`: position and orientation in 3D space
//! - `Projection`: perspective projection settings

use cgmath::{EuclideanSpace, Matrix4, Point3};

pub mod camera;

/// Read-only access to the camera the overlays are drawn from.
pub trait CameraView {
    /// Camera position in world space.
    fn position(&self) -> Point3<f32>;

    /// View matrix without the camera translation.
    ///
    /// Callers translate geometry by `-position()` themselves.
    fn view_matrix(&self) -> Matrix4<f32>;

    /// Projection matrix.
    fn projection_matrix(&self) -> Matrix4<f32>;
}

/// Model-view-projection for world-space geometry drawn relative to the camera.
///
/// The model matrix translates by `-camera.position()` before the rotation-only view.
pub fn camera_relative_transform(camera: &dyn CameraView) -> Matrix4<f32> {
    let model = Matrix4::from_translation(-camera.position().to_vec());
    camera.projection_matrix() * camera.view_matrix() * model
}

/// A camera together with its projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// The current camera position and orientation
    pub camera: camera::Camera,
    /// The current projection
    pub projection: camera::Projection,
}

impl CameraState {
    /// Creates a new camera state.
    pub fn new(camera: camera::Camera, projection: camera::Projection) -> Self {
        Self { camera, projection }
    }
}

impl CameraView for CameraState {
    fn position(&self) -> Point3<f32> {
        self.camera.position
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.camera.calc_rotation_matrix()
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection.calc_matrix()
    }
}
