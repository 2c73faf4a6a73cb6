//! GPU rendering subsystem.
//!
//! Each renderer owns its pipelines, instance lists and buffers, and records
//! into a render pass the engine opens once per frame.
//!
//! Convention:
//! - CPU geometry is in surface pixels (top-left origin, +Y down).
//! - Vertex shaders map to NDC through the shared projection uniform (group 0).

mod buffer;
mod common;
mod ctx;
pub mod primitives;
mod text;

pub use buffer::{BufferCapacity, InstanceBuffer};
pub use ctx::RenderCtx;
pub use primitives::{PrimitiveKind, PrimitiveRenderer, PrimitiveStats};
pub use text::{TextRenderer, TextTexture};
