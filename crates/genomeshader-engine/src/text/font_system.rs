use std::fmt;

use fontdue::layout::{CoordinateSystem, GlyphPosition, Layout, LayoutSettings, TextStyle as LayoutStyle};

use crate::error::TextError;
use crate::paint::ColorInput;

use super::raster::{baseline_in_box, raster_extent, RasterImage, TextRasterizer};
use super::style::ResolvedStyle;

/// Opaque handle to a face loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

#[derive(Clone)]
struct FontFace {
    family: String,
    weight: u16,
    font: fontdue::Font,
}

/// Registered font faces, rasterized with fontdue.
///
/// Faces are immutable after loading. A style's family is matched
/// case-insensitively; generic or unknown families fall back to every loaded
/// face. Among candidates the face with the closest weight wins.
#[derive(Clone, Default)]
pub struct FontSystem {
    faces: Vec<FontFace>,
}

impl fmt::Debug for FontSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.faces.iter().map(|face| (&face.family, face.weight)))
            .finish()
    }
}

impl FontSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and stores a TrueType or OpenType face from raw bytes.
    pub fn load_font(&mut self, family: impl Into<String>, weight: u16, bytes: &[u8]) -> Result<FontId, TextError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| TextError::FontLoad(e.to_string()))?;
        let id = FontId(self.faces.len());
        self.faces.push(FontFace {
            family: family.into(),
            weight,
            font,
        });
        Ok(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Index of the face used for `family` at `weight`.
    pub fn select(&self, family: &str, weight: u16) -> Option<FontId> {
        let named = self
            .faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.family.eq_ignore_ascii_case(family))
            .min_by_key(|(_, f)| f.weight.abs_diff(weight));

        named
            .or_else(|| {
                self.faces
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, f)| f.weight.abs_diff(weight))
            })
            .map(|(i, _)| FontId(i))
    }

    fn font_for(&self, style: &ResolvedStyle) -> Result<&fontdue::Font, TextError> {
        let id = self.select(&style.font_family, style.font_weight).ok_or(TextError::NoFonts)?;
        Ok(&self.faces[id.0].font)
    }

    fn layout(font: &fontdue::Font, text: &str, px: f32) -> Vec<GlyphPosition> {
        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[font], &LayoutStyle::new(text, px, 0));
        layout.glyphs().clone()
    }

    /// Baseline row inside a raster `height` pixels tall.
    fn baseline(font: &fontdue::Font, px: f32, height: u32) -> f32 {
        let (ascent, descent) = font
            .horizontal_line_metrics(px)
            .map(|m| (m.ascent, m.descent))
            .unwrap_or((px * 0.8, -px * 0.2));
        baseline_in_box(ascent, descent, height as f32)
    }

    /// Pen position after the last glyph, so trailing advances count.
    fn advance_width(font: &fontdue::Font, glyphs: &[GlyphPosition], px: f32) -> f32 {
        glyphs
            .iter()
            .map(|g| {
                let m = font.metrics_indexed(g.key.glyph_index, px);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max)
    }
}

impl TextRasterizer for FontSystem {
    fn measure_width(&self, text: &str, style: &ResolvedStyle) -> Result<f32, TextError> {
        let font = self.font_for(style)?;
        let glyphs = Self::layout(font, text, style.font_size);
        Ok(Self::advance_width(font, &glyphs, style.font_size))
    }

    fn rasterize(&self, text: &str, style: &ResolvedStyle) -> Result<RasterImage, TextError> {
        let font = self.font_for(style)?;
        let px = style.font_size;
        let glyphs = Self::layout(font, text, px);
        let measured = Self::advance_width(font, &glyphs, px);

        let (width, height) = raster_extent(measured, px);
        if width == 0 || height == 0 {
            return Err(TextError::EmptyText);
        }

        let color = ColorInput::from(style.fill.as_str()).to_rgba(1.0);
        let offset_x = (width as f32 - measured) * style.align.offset_factor();
        let baseline = Self::baseline(font, px, height);

        let mut image = RasterImage::new(width, height);
        for g in glyphs.iter().filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0) {
            let (metrics, coverage) = font.rasterize_config(g.key);
            let x0 = (g.x + offset_x).round() as i32;
            let y0 = (baseline - (metrics.ymin as f32 + metrics.height as f32)).round() as i32;
            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let c = coverage[row * metrics.width + col];
                    if c == 0 {
                        continue;
                    }
                    image.blend_pixel(x0 + col as i32, y0 + row as i32, color, c as f32 / 255.0);
                }
            }
        }

        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::style::TextStyle;

    #[test]
    fn empty_system_reports_no_fonts() {
        let fonts = FontSystem::new();
        let style = TextStyle::new().resolve();
        assert_eq!(fonts.measure_width("A", &style), Err(TextError::NoFonts));
        assert_eq!(fonts.rasterize("A", &style), Err(TextError::NoFonts));
        assert_eq!(fonts.select("sans-serif", 400), None);
    }

    #[test]
    fn garbage_bytes_fail_to_load() {
        let mut fonts = FontSystem::new();
        assert!(matches!(
            fonts.load_font("Broken", 400, b"not a font"),
            Err(TextError::FontLoad(_))
        ));
        assert!(fonts.is_empty());
    }
}
