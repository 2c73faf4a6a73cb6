//! Color inputs accepted by the drawing API.
//!
//! Instance colors are stored straight-alpha; shaders premultiply where their
//! blend state needs it.

pub mod color;

pub use color::{hex_to_rgba, ColorInput};
