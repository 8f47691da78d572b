//! Render configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ShadingMode, Traversal, DEFAULT_BUCKET_SIZE};

/// Errors that can occur while reading a settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Thread, grid and tile configuration for a render.
///
/// Missing fields in a settings file take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Worker count including the calling thread
    pub num_threads: usize,
    /// Grid cells per axis
    pub grid_dim: [u32; 3],
    /// Tile width and height in pixels
    pub block_dim: [u32; 2],
    pub traversal: Traversal,
    pub shading_mode: ShadingMode,
    pub shadow_bias: f32,
    pub reflection_bias: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            num_threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            grid_dim: [5, 5, 5],
            block_dim: [DEFAULT_BUCKET_SIZE, DEFAULT_BUCKET_SIZE],
            traversal: Traversal::default(),
            shading_mode: ShadingMode::default(),
            shadow_bias: 1e-4,
            reflection_bias: 1e-4,
        }
    }
}

impl RenderSettings {
    /// Read settings from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> SettingsResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Copy with thread count, grid and block dimensions raised to at least 1.
    pub fn sanitized(&self) -> Self {
        Self {
            num_threads: self.num_threads.max(1),
            grid_dim: self.grid_dim.map(|d| d.max(1)),
            block_dim: self.block_dim.map(|d| d.max(1)),
            ..self.clone()
        }
    }
}
