//! Error types
//!
//! Only construction and configuration can fail. Everything the simulation
//! does per tick is total.

use thiserror::Error;

/// Rejected body geometry
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PhysicsError {
    #[error("invalid geometry: ball radius must be positive, got {radius}")]
    InvalidGeometry { radius: f32 },
    #[error("invalid block size: {width}x{height}")]
    InvalidBlockSize { width: f32, height: f32 },
}

/// Rejected level container
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LevelError {
    #[error("invalid level dimensions: {width}x{height}")]
    InvalidDimensions { width: f32, height: f32 },
    #[error("peg radius {0} must be positive and set before anything is placed")]
    InvalidPegRadius(f32),
}

/// Configuration loading failure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
