use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{RenderError, TextError};

use super::raster::{raster_extent, RasterImage, TextRasterizer};
use super::style::{cache_key, TextStyle};

/// A rasterized text string and the resource it was uploaded to.
#[derive(Debug)]
pub struct CachedText<T> {
    id: u64,
    width: u32,
    height: u32,
    texture: T,
}

impl<T> CachedText<T> {
    /// Unique within the owning cache.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn texture(&self) -> &T {
        &self.texture
    }
}

/// Text + style → uploaded raster.
///
/// Entries live as long as the cache; nothing is evicted. Once the entry
/// count passes `warn_entries` a single warning is logged.
#[derive(Debug)]
pub struct TextCache<T> {
    entries: HashMap<String, Rc<CachedText<T>>>,
    next_id: u64,
    rasterizations: u64,
    warn_entries: usize,
    warned: bool,
}

impl<T> TextCache<T> {
    pub fn new(warn_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            next_id: 0,
            rasterizations: 0,
            warn_entries,
            warned: false,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total cache misses that went through the rasterizer.
    #[inline]
    pub fn rasterizations(&self) -> u64 {
        self.rasterizations
    }

    pub fn get(&self, text: &str, style: &TextStyle) -> Option<Rc<CachedText<T>>> {
        let key = cache_key(text, style).ok()?;
        self.entries.get(&key).cloned()
    }

    /// Returns the entry for `text` in `style`, rasterizing and uploading it
    /// on a miss. A hit does no rasterization and no upload.
    ///
    /// The raster extent is measured and checked against `max_dimension`
    /// before any pixels are allocated. `upload` runs to completion before the
    /// entry is stored, so any entry handed out is ready to draw.
    pub fn get_or_rasterize<R, F>(
        &mut self,
        rasterizer: &R,
        text: &str,
        style: &TextStyle,
        max_dimension: u32,
        upload: F,
    ) -> Result<Rc<CachedText<T>>, RenderError>
    where
        R: TextRasterizer + ?Sized,
        F: FnOnce(&RasterImage) -> Result<T, RenderError>,
    {
        let key = cache_key(text, style)?;
        if let Some(hit) = self.entries.get(&key) {
            return Ok(Rc::clone(hit));
        }

        let resolved = style.resolve();
        let (width, height) = raster_extent(rasterizer.measure_width(text, &resolved)?, resolved.font_size);
        if width > max_dimension || height > max_dimension {
            return Err(RenderError::TextureTooLarge {
                width,
                height,
                max: max_dimension,
            });
        }

        self.rasterizations += 1;
        let image = rasterizer.rasterize(text, &resolved)?;
        if image.width == 0 || image.height == 0 {
            return Err(TextError::EmptyText.into());
        }
        log::debug!("text cache miss: {key:?} -> {}x{}", image.width, image.height);

        let texture = upload(&image)?;
        let entry = Rc::new(CachedText {
            id: self.next_id,
            width: image.width,
            height: image.height,
            texture,
        });
        self.next_id += 1;
        self.entries.insert(key, Rc::clone(&entry));

        if !self.warned && self.entries.len() > self.warn_entries {
            log::warn!(
                "text cache holds {} entries; entries are never evicted",
                self.entries.len()
            );
            self.warned = true;
        }

        Ok(entry)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::text::raster::raster_extent;
    use crate::text::style::ResolvedStyle;

    /// Fixed-advance rasterizer that counts calls.
    #[derive(Default)]
    pub(crate) struct CountingRasterizer {
        pub calls: Cell<u32>,
    }

    impl CountingRasterizer {
        pub(crate) const ADVANCE: f32 = 6.5;
    }

    impl TextRasterizer for CountingRasterizer {
        fn measure_width(&self, text: &str, _style: &ResolvedStyle) -> Result<f32, TextError> {
            Ok(text.chars().count() as f32 * Self::ADVANCE)
        }

        fn rasterize(&self, text: &str, style: &ResolvedStyle) -> Result<RasterImage, TextError> {
            self.calls.set(self.calls.get() + 1);
            let (w, h) = raster_extent(self.measure_width(text, style)?, style.font_size);
            if w == 0 {
                return Err(TextError::EmptyText);
            }
            Ok(RasterImage::new(w, h))
        }
    }

    pub(crate) const MAX_DIM: u32 = 8192;

    fn no_upload(_: &RasterImage) -> Result<(), RenderError> {
        Ok(())
    }

    #[test]
    fn second_lookup_is_a_hit() {
        let r = CountingRasterizer::default();
        let mut cache = TextCache::new(100);
        let style = TextStyle::new().font_size(12.0);

        let a = cache.get_or_rasterize(&r, "Hello", &style, MAX_DIM, no_upload).unwrap();
        let b = cache.get_or_rasterize(&r, "Hello", &style, MAX_DIM, no_upload).unwrap();

        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(r.calls.get(), 1);
        assert_eq!(cache.rasterizations(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn hit_skips_upload() {
        let r = CountingRasterizer::default();
        let mut cache = TextCache::new(100);
        let style = TextStyle::new();
        let uploads = Cell::new(0);
        let upload = |_: &RasterImage| {
            uploads.set(uploads.get() + 1);
            Ok(())
        };

        cache.get_or_rasterize(&r, "chr1", &style, MAX_DIM, upload).unwrap();
        cache.get_or_rasterize(&r, "chr1", &style, MAX_DIM, upload).unwrap();
        assert_eq!(uploads.get(), 1);
    }

    #[test]
    fn entry_size_follows_measurement() {
        let r = CountingRasterizer::default();
        let mut cache = TextCache::new(100);
        // 5 chars * 6.5 = 32.5 -> 33; 12 * 1.2 = 14.4 -> 15
        let e = cache
            .get_or_rasterize(&r, "Hello", &TextStyle::new().font_size(12.0), MAX_DIM, no_upload)
            .unwrap();
        assert_eq!((e.width(), e.height()), (33, 15));
    }

    #[test]
    fn different_styles_are_different_entries() {
        let r = CountingRasterizer::default();
        let mut cache = TextCache::new(100);
        let a = cache.get_or_rasterize(&r, "A", &TextStyle::new(), MAX_DIM, no_upload).unwrap();
        let b = cache
            .get_or_rasterize(&r, "A", &TextStyle::new().fill("#C4D1D9"), MAX_DIM, no_upload)
            .unwrap();
        assert!(!Rc::ptr_eq(&a, &b));
        assert_ne!(a.id(), b.id());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn rasterization_failure_propagates_and_caches_nothing() {
        let r = CountingRasterizer::default();
        let mut cache: TextCache<()> = TextCache::new(100);
        let err = cache.get_or_rasterize(&r, "", &TextStyle::new(), MAX_DIM, no_upload).unwrap_err();
        assert_eq!(err, RenderError::Text(TextError::EmptyText));
        assert!(cache.is_empty());
        assert!(cache.get("", &TextStyle::new()).is_none());
    }

    #[test]
    fn upload_failure_caches_nothing() {
        let r = CountingRasterizer::default();
        let mut cache: TextCache<()> = TextCache::new(100);
        let res = cache.get_or_rasterize(&r, "wide", &TextStyle::new(), MAX_DIM, |_| {
            Err(RenderError::TextureTooLarge {
                width: 1,
                height: 1,
                max: 0,
            })
        });
        assert!(res.is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn oversized_extent_is_rejected_before_rasterizing() {
        let r = CountingRasterizer::default();
        let mut cache: TextCache<()> = TextCache::new(100);
        let err = cache
            .get_or_rasterize(&r, "Hello", &TextStyle::new().font_size(1.0e9), MAX_DIM, no_upload)
            .unwrap_err();
        assert!(matches!(err, RenderError::TextureTooLarge { max: MAX_DIM, .. }));
        assert_eq!(r.calls.get(), 0);
        assert_eq!(cache.rasterizations(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn long_label_over_limit_is_rejected() {
        let r = CountingRasterizer::default();
        let mut cache: TextCache<()> = TextCache::new(100);
        // 20 chars * 6.5 = 130 px wide
        let label = "x".repeat(20);
        let err = cache
            .get_or_rasterize(&r, &label, &TextStyle::new(), 128, no_upload)
            .unwrap_err();
        assert_eq!(
            err,
            RenderError::TextureTooLarge {
                width: 130,
                height: 15,
                max: 128
            }
        );
        assert_eq!(r.calls.get(), 0);
    }

    #[test]
    fn warning_threshold_does_not_evict() {
        let r = CountingRasterizer::default();
        let mut cache = TextCache::new(2);
        for label in ["a", "b", "c", "d"] {
            cache.get_or_rasterize(&r, label, &TextStyle::new(), MAX_DIM, no_upload).unwrap();
        }
        assert_eq!(cache.len(), 4);
        assert!(cache.get("a", &TextStyle::new()).is_some());
    }
}
