// THEORY:
// This file is the main entry point for the `proximity_vision` library crate. It
// exposes the `ProximityPipeline` and its associated data structures
// (`PipelineConfig`, `FrameReport`, the overlay display list) as the high-level
// interface of the engine. The individual stages in `core_modules` stay public so
// they can be reused or tested in isolation, but a consumer only needs the pipeline.
//
// The crate is pure Rust and works on `image` buffers. Capturing frames and painting
// the overlay are left to the caller.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod pipeline;
pub mod utils;

pub use config::{DisplaySettings, Settings};
pub use core_modules::contour::{Contour, Point};
pub use core_modules::hsv::{Hsv, HsvRange};
pub use core_modules::overlay::{Fill, Overlay, Primitive, Rgb, TextAlign};
pub use error::{Result, VisionError};
pub use pipeline::{
    FrameReport, HandDetection, PipelineConfig, ProximityPipeline, ProximityState, ProximityZones,
};
