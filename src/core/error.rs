//! Error types for the editor renderer.
//!
//! GPU failures are reported asynchronously by the graphics context and drained after
//! uploads and draws. Only [`GpuError::OutOfMemory`] is returned to callers; the other
//! kinds are logged and rendering continues.

use thiserror::Error;

/// Errors reported by the graphics context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GpuError {
    /// The device could not satisfy an allocation.
    #[error("Out of memory! Try lowering the voxel view distance.")]
    OutOfMemory,

    /// A numeric or enumerated argument was out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation is not allowed in the current state.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// The render target is incomplete or no longer matches the surface.
    #[error("invalid framebuffer state: {0}")]
    InvalidFramebufferState(String),

    /// Anything the backend reports that does not fit the kinds above.
    #[error("unknown GPU error: {0}")]
    Unknown(String),
}

impl GpuError {
    /// Maps an uncaptured wgpu error onto the taxonomy.
    pub fn from_wgpu(err: &wgpu::Error) -> Self {
        match err {
            wgpu::Error::OutOfMemory { .. } => GpuError::OutOfMemory,
            wgpu::Error::Validation { description, .. } => {
                GpuError::InvalidOperation(description.clone())
            }
            other => GpuError::Unknown(other.to_string()),
        }
    }

    /// Maps a surface acquisition error onto the taxonomy.
    pub fn from_surface(err: &wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost => {
                GpuError::InvalidFramebufferState(err.to_string())
            }
            wgpu::SurfaceError::OutOfMemory => GpuError::OutOfMemory,
            other => GpuError::Unknown(other.to_string()),
        }
    }

    /// Human readable explanation logged when the error is drained.
    pub fn describe(&self) -> String {
        match self {
            GpuError::OutOfMemory => self.to_string(),
            GpuError::InvalidArgument(detail) => format!(
                "INVALID_ARGUMENT - A numeric argument is out of range. ({detail})"
            ),
            GpuError::InvalidOperation(detail) => format!(
                "INVALID_OPERATION - The specified operation is not allowed in the current state. ({detail})"
            ),
            GpuError::InvalidFramebufferState(detail) => format!(
                "The command is trying to render to or read from the framebuffer while the \
                 currently bound framebuffer is not framebuffer complete. ({detail})"
            ),
            GpuError::Unknown(detail) => format!("GPU ERROR ({detail})"),
        }
    }
}

/// Errors returned by renderer operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A GPU error that must be handled by the caller.
    #[error(transparent)]
    Gpu(#[from] GpuError),

    /// `release` was called on a mesh buffer that was already released.
    #[error("mesh buffer released twice")]
    DoubleRelease,

    /// Data was uploaded into a mesh buffer after it was released.
    #[error("mesh buffer used after release")]
    UseAfterRelease,

    /// The cursor was drawn in brushed mode before any brush was meshed.
    #[error("brushed cursor drawn before a brush was meshed")]
    BrushNotMeshed,

    /// The cursor was drawn at a position with no `i32` grid cell.
    #[error("cursor position {0:?} is outside the voxel grid range")]
    PositionOutOfRange([f32; 3]),

    /// A voxel grid was built from a buffer that does not match its dimensions.
    #[error("voxel grid expects {expected} voxels, got {actual}")]
    GridSize {
        /// `width * height * length`
        expected: usize,
        /// Length of the supplied voxel buffer
        actual: usize,
    },

    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for [`crate::core::RenderConfig`].
    #[error("failed to parse config: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, RenderError>;
