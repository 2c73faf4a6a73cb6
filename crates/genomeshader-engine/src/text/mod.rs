//! CPU side of text rendering: styles, rasterization, the texture cache and
//! texture-grouped batching.

mod batch;
mod cache;
mod font_system;
mod placement;
mod raster;
mod style;

pub use batch::{GroupedText, TextBatch, TextGroup, TextInstance, TextQuadInstance};
pub use cache::{CachedText, TextCache};
pub use font_system::{FontId, FontSystem};
pub use placement::{place_text, place_text_rotated, rotated_bounds, TextPlacement};
pub use raster::{raster_extent, RasterImage, TextRasterizer, LINE_HEIGHT_FACTOR};
pub use style::{cache_key, ResolvedStyle, TextAlign, TextStyle};
