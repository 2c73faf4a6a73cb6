use crate::error::TextError;

use super::style::ResolvedStyle;

/// Raster height is `ceil(font_size * LINE_HEIGHT_FACTOR)`.
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// RGBA8 pixels, premultiplied, rows tightly packed top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RasterImage {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    #[inline]
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }

    /// Composites `color` (straight RGBA) with `coverage` over the pixel at
    /// `(x, y)`. Out-of-bounds writes are dropped.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: [f32; 4], coverage: f32) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let a = (color[3] * coverage).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let dst = &mut self.pixels[i..i + 4];
        let src = [color[0] * a, color[1] * a, color[2] * a, a];
        for (d, s) in dst.iter_mut().zip(src) {
            let out = s + (*d as f32 / 255.0) * (1.0 - a);
            *d = (out.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
    }
}

/// Pixel size of the raster for text measured at `measured_width`.
pub fn raster_extent(measured_width: f32, font_size: f32) -> (u32, u32) {
    let width = measured_width.max(0.0).ceil() as u32;
    let height = (font_size.max(0.0) * LINE_HEIGHT_FACTOR).ceil() as u32;
    (width, height)
}

/// Baseline position, from the top, for a line with the given font `ascent`
/// and `descent` (negative, below the baseline) in a box `height` tall.
///
/// A line that fits is centered vertically; a taller one is scaled to fit so
/// descenders stay inside the box.
pub fn baseline_in_box(ascent: f32, descent: f32, height: f32) -> f32 {
    let extent = ascent - descent;
    if extent <= 0.0 {
        return height;
    }
    if extent > height {
        ascent * height / extent
    } else {
        ascent + (height - extent) * 0.5
    }
}

/// The 2D rasterization collaborator: text metrics plus pixel output.
pub trait TextRasterizer {
    /// Advance width of `text` in pixels.
    fn measure_width(&self, text: &str, style: &ResolvedStyle) -> Result<f32, TextError>;

    /// Rasterizes `text` into an image sized by [`raster_extent`].
    fn rasterize(&self, text: &str, style: &ResolvedStyle) -> Result<RasterImage, TextError>;
}
