//! genomeshader engine crate.
//!
//! Batched 2D rendering of rectangles, triangles, lines and cached text onto
//! a wgpu surface, plus the winit runtime that drives it.

pub mod core;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod text;
pub mod window;

mod config;
mod engine;
mod error;

pub use config::EngineConfig;
pub use engine::{Engine, FrameOutcome};
pub use error::{RenderError, TextError};
