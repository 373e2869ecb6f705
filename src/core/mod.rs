//! # Core Module
//!
//! Crate-wide building blocks shared by the rendering code: the error taxonomy and
//! the runtime configuration.
//!
//! ## Key Components
//! - `GpuError`: closed set of errors reported by the graphics context
//! - `RenderError`: everything a renderer operation can fail with
//! - `RenderConfig`: tunables loaded from JSON

pub mod config;
pub mod error;

pub use config::RenderConfig;
pub use error::{GpuError, RenderError, Result};
