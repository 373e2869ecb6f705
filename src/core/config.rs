//! Runtime configuration for the editor renderer.
//!
//! Every field has a default so a partial JSON document (or none at all) is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::Result;

/// Tunables for cursor and overlay drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// RGBA color baked into the reference cube. Alpha is applied by the blend state.
    pub reference_color: [u8; 4],
    /// Line width used for the wireframe selection box.
    pub wireframe_line_width: f32,
    /// Line width used by debug lines when the caller has no preference.
    pub debug_line_width: f32,
    /// Number of draws the per-frame uniform buffer is sized for before it grows.
    pub initial_draw_capacity: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            reference_color: [0, 0, 0, 100],
            wireframe_line_width: 2.0,
            debug_line_width: 1.0,
            initial_draw_capacity: 64,
        }
    }
}

impl RenderConfig {
    /// Parses a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Arguments
    /// * `path` - Location of the JSON file
    ///
    /// # Returns
    /// The parsed configuration, or `RenderError::Io` / `RenderError::Config`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        log::info!("Loaded render config: {:?}", config);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RenderError;

    #[test]
    fn test_default_reference_color() {
        assert_eq!(RenderConfig::default().reference_color, [0, 0, 0, 100]);
        assert_eq!(RenderConfig::default().wireframe_line_width, 2.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = RenderConfig::from_json_str(r#"{ "wireframe_line_width": 3.5 }"#).unwrap();
        assert_eq!(config.wireframe_line_width, 3.5);
        assert_eq!(config.reference_color, [0, 0, 0, 100]);
        assert_eq!(config.initial_draw_capacity, 64);
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(
            RenderConfig::from_json_str("{}").unwrap(),
            RenderConfig::default()
        );
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = RenderConfig::from_json_str("{ reference_color: ").unwrap_err();
        assert!(matches!(err, RenderError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RenderConfig::load("/definitely/not/here/render.json").unwrap_err();
        assert!(matches!(err, RenderError::Io(_)));
    }
}
