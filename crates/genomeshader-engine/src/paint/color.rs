/// Color as accepted by the `add_*` calls.
///
/// Every form normalizes to straight-alpha RGBA in `[0, 1]`:
/// - `Hex("#RRGGBB")` and `Packed(0xRRGGBB)` take the caller's alpha
/// - `Rgb([r, g, b])` is extended with the caller's alpha
/// - `Rgba([r, g, b, a])` passes through unchanged
#[derive(Debug, Clone, PartialEq)]
pub enum ColorInput {
    Hex(String),
    Packed(u32),
    Rgb([f32; 3]),
    Rgba([f32; 4]),
}

impl ColorInput {
    /// Normalizes to `[r, g, b, a]`, using `alpha` where the input carries none.
    pub fn to_rgba(&self, alpha: f32) -> [f32; 4] {
        match self {
            ColorInput::Hex(s) => match parse_hex(s) {
                Some(packed) => unpack(packed, alpha),
                None => {
                    log::warn!("invalid hex color {s:?}; using black");
                    [0.0, 0.0, 0.0, alpha]
                }
            },
            ColorInput::Packed(v) => unpack(*v, alpha),
            ColorInput::Rgb([r, g, b]) => [*r, *g, *b, alpha],
            ColorInput::Rgba(c) => *c,
        }
    }
}

impl From<&str> for ColorInput {
    fn from(s: &str) -> Self {
        ColorInput::Hex(s.to_owned())
    }
}

impl From<String> for ColorInput {
    fn from(s: String) -> Self {
        ColorInput::Hex(s)
    }
}

impl From<u32> for ColorInput {
    fn from(v: u32) -> Self {
        ColorInput::Packed(v)
    }
}

impl From<[f32; 3]> for ColorInput {
    fn from(c: [f32; 3]) -> Self {
        ColorInput::Rgb(c)
    }
}

impl From<[f32; 4]> for ColorInput {
    fn from(c: [f32; 4]) -> Self {
        ColorInput::Rgba(c)
    }
}

/// Converts any accepted color form to normalized RGBA.
///
/// `hex_to_rgba("#FF0000", 1.0) == [1.0, 0.0, 0.0, 1.0]`
#[inline]
pub fn hex_to_rgba(color: impl Into<ColorInput>, alpha: f32) -> [f32; 4] {
    color.into().to_rgba(alpha)
}

fn parse_hex(s: &str) -> Option<u32> {
    let digits = s.trim().strip_prefix('#').unwrap_or(s.trim());
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

#[inline]
fn unpack(v: u32, alpha: f32) -> [f32; 4] {
    let channel = |shift: u32| ((v >> shift) & 0xFF) as f32 / 255.0;
    [channel(16), channel(8), channel(0), alpha]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 4], b: [f32; 4]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-6)
    }

    #[test]
    fn hex_string_red() {
        assert_eq!(hex_to_rgba("#FF0000", 1.0), [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn packed_green_keeps_alpha() {
        assert_eq!(hex_to_rgba(0x00FF00u32, 0.5), [0.0, 1.0, 0.0, 0.5]);
    }

    #[test]
    fn hex_without_hash_and_lowercase() {
        assert!(close(hex_to_rgba("336699", 1.0), [0.2, 0.4, 0.6, 1.0]));
        assert!(close(hex_to_rgba("#33669a", 1.0), [0.2, 0.4, 154.0 / 255.0, 1.0]));
    }

    #[test]
    fn rgb_array_takes_default_alpha() {
        assert_eq!(hex_to_rgba([0.1, 0.2, 0.3], 0.25), [0.1, 0.2, 0.3, 0.25]);
    }

    #[test]
    fn rgba_array_passes_through() {
        assert_eq!(hex_to_rgba([0.1, 0.2, 0.3, 0.9], 0.25), [0.1, 0.2, 0.3, 0.9]);
    }

    #[test]
    fn malformed_hex_is_black() {
        assert_eq!(hex_to_rgba("#12345", 0.7), [0.0, 0.0, 0.0, 0.7]);
        assert_eq!(hex_to_rgba("#GGGGGG", 1.0), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn packed_ignores_high_byte() {
        assert_eq!(hex_to_rgba(0xAA_FF_FF_FF_u32, 1.0), [1.0, 1.0, 1.0, 1.0]);
    }
}
