//! Error types for the simulation and its setup

use thiserror::Error;

/// Everything that can go wrong before the first frame runs.
///
/// Per-frame code is total; only setup (assets, viewport, spawn layout,
/// settings) is fallible.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("No fruit assets were supplied")]
    NoAssets,

    #[error("Failed to load asset '{id}': {reason}")]
    AssetLoad { id: String, reason: String },

    #[error("Asset '{id}' has no usable intrinsic size")]
    InvalidAsset { id: String },

    #[error("Invalid viewport {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("No spawn points fit a {width}px wide viewport after {attempts} attempts")]
    NoSpawnPoints { width: f32, attempts: u32 },

    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
