use std::fmt;

/// Failure while turning text into a cached raster.
#[derive(Debug, Clone, PartialEq)]
pub enum TextError {
    /// The measured text is zero pixels wide; there is nothing to upload.
    EmptyText,
    /// No font face has been registered with the rasterizer.
    NoFonts,
    /// A font file could not be parsed.
    FontLoad(String),
    /// The style descriptor could not be serialized into a cache key.
    Style(String),
}

impl fmt::Display for TextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextError::EmptyText => write!(f, "text has zero measured width"),
            TextError::NoFonts => write!(f, "no fonts registered"),
            TextError::FontLoad(msg) => write!(f, "font load error: {msg}"),
            TextError::Style(msg) => write!(f, "text style error: {msg}"),
        }
    }
}

impl std::error::Error for TextError {}

/// Errors surfaced by the rendering engine.
///
/// Categories:
/// - `Unavailable`: a required GPU capability is missing. Fatal at initialization.
/// - `BufferTooLarge` / `TextureTooLarge`: a resource would exceed device limits.
/// - `Text`: rasterizing a cache miss failed. No fallback glyph is substituted.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    Unavailable { reason: String },
    BufferTooLarge { label: &'static str, requested: u64, max: u64 },
    TextureTooLarge { width: u32, height: u32, max: u32 },
    Text(TextError),
}

impl RenderError {
    pub(crate) fn unavailable(reason: impl Into<String>) -> Self {
        RenderError::Unavailable { reason: reason.into() }
    }

    /// Returns true for errors that mean rendering cannot work at all.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RenderError::Unavailable { .. })
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Unavailable { reason } => write!(f, "rendering unavailable: {reason}"),
            RenderError::BufferTooLarge { label, requested, max } => write!(
                f,
                "{label}: buffer of {requested} bytes exceeds device limit of {max} bytes"
            ),
            RenderError::TextureTooLarge { width, height, max } => write!(
                f,
                "texture {width}x{height} exceeds device limit of {max}px per side"
            ),
            RenderError::Text(e) => write!(f, "text rasterization failed: {e}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Text(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TextError> for RenderError {
    fn from(e: TextError) -> Self {
        RenderError::Text(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_reads_as_rendering_unavailable() {
        let e = RenderError::unavailable("no adapter");
        assert_eq!(e.to_string(), "rendering unavailable: no adapter");
        assert!(e.is_fatal());
    }

    #[test]
    fn text_errors_are_not_fatal() {
        let e: RenderError = TextError::EmptyText.into();
        assert!(!e.is_fatal());
        assert!(std::error::Error::source(&e).is_some());
    }

    #[test]
    fn anyhow_root_cause_downcasts() {
        let err = anyhow::Error::new(RenderError::unavailable("no surface"))
            .context("failed to initialize renderer");
        let root = err.root_cause().downcast_ref::<RenderError>();
        assert!(matches!(root, Some(RenderError::Unavailable { .. })));
    }
}
