//! Instanced primitive renderer: rectangles, triangles and lines.

mod batch;
mod renderer;
pub mod shading;

pub use batch::{
    LineInstance, PrimitiveBatches, PrimitiveDraw, PrimitiveKind, PrimitiveStats, RectInstance,
    TriangleInstance,
};
pub use renderer::PrimitiveRenderer;
