use serde::{Deserialize, Serialize};

use crate::error::TextError;

pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";
pub const DEFAULT_FONT_SIZE: f32 = 12.0;
pub const DEFAULT_FONT_WEIGHT: u16 = 400;
pub const DEFAULT_FILL: &str = "#000000";

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Fraction of the slack between raster width and measured width placed
    /// before the text.
    pub fn offset_factor(self) -> f32 {
        match self {
            TextAlign::Left => 0.0,
            TextAlign::Center => 0.5,
            TextAlign::Right => 1.0,
        }
    }
}

/// Style options as passed by the host. Unset options take the defaults of
/// [`ResolvedStyle`]; only set options take part in the cache key.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
}

impl TextStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn font_weight(mut self, weight: u16) -> Self {
        self.font_weight = Some(weight);
        self
    }

    pub fn fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = Some(align);
        self
    }

    pub fn resolve(&self) -> ResolvedStyle {
        ResolvedStyle {
            font_family: self
                .font_family
                .clone()
                .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_owned()),
            font_size: self.font_size.unwrap_or(DEFAULT_FONT_SIZE),
            font_weight: self.font_weight.unwrap_or(DEFAULT_FONT_WEIGHT),
            fill: self.fill.clone().unwrap_or_else(|| DEFAULT_FILL.to_owned()),
            align: self.align.unwrap_or_default(),
        }
    }
}

/// A [`TextStyle`] with every option filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: u16,
    pub fill: String,
    pub align: TextAlign,
}

/// Cache key: the literal text followed by the style's JSON form.
///
/// The two parts are concatenated without a separator or escaping, so text
/// ending in something that looks like JSON can share a key with a different
/// text/style pair.
pub fn cache_key(text: &str, style: &TextStyle) -> Result<String, TextError> {
    let json = serde_json::to_string(style).map_err(|e| TextError::Style(e.to_string()))?;
    Ok(format!("{text}{json}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_serializes_only_set_options() {
        let key = cache_key("Hello", &TextStyle::new().font_size(12.0)).unwrap();
        assert_eq!(key, r#"Hello{"fontSize":12.0}"#);
        assert_eq!(cache_key("Hi", &TextStyle::new()).unwrap(), "Hi{}");
    }

    #[test]
    fn key_distinguishes_styles() {
        let a = cache_key("chr1", &TextStyle::new().fill("#000000")).unwrap();
        let b = cache_key("chr1", &TextStyle::new().fill("#71838F")).unwrap();
        let c = cache_key("chr1", &TextStyle::new().align(TextAlign::Center)).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert!(c.ends_with(r#"{"align":"center"}"#));
    }

    #[test]
    fn key_is_unescaped_concatenation() {
        let k = cache_key("a{}", &TextStyle::new()).unwrap();
        assert_eq!(k, "a{}{}");
    }

    #[test]
    fn resolve_fills_defaults() {
        let r = TextStyle::new().font_weight(700).resolve();
        assert_eq!(r.font_family, "sans-serif");
        assert_eq!(r.font_size, 12.0);
        assert_eq!(r.font_weight, 700);
        assert_eq!(r.fill, "#000000");
        assert_eq!(r.align, TextAlign::Left);
    }

    #[test]
    fn style_parses_from_camel_case_json() {
        let s: TextStyle = serde_json::from_str(r#"{"fontFamily":"Inter","fontSize":14,"align":"right"}"#).unwrap();
        assert_eq!(s.font_family.as_deref(), Some("Inter"));
        assert_eq!(s.font_size, Some(14.0));
        assert_eq!(s.align, Some(TextAlign::Right));
        assert_eq!(s.fill, None);
    }
}
