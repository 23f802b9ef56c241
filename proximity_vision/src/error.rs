// THEORY:
// Every fallible entry point of the engine reports through one error enum so the
// runner can bubble it up with `?` into its own `anyhow` context. The engine never
// panics on bad input: an empty frame or a nonsensical config is a value, not a crash.

use thiserror::Error;

/// Errors produced by the `proximity_vision` engine.
#[derive(Debug, Error)]
pub enum VisionError {
    /// The frame handed to the pipeline has zero width or height.
    #[error("received an empty frame")]
    EmptyFrame,
    /// A configuration value is out of its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, VisionError>;
