/// Where a text quad lands on screen.
///
/// `size` is the quad (texture) size; `bounds` is the axis-aligned box the
/// quad occupies after rotation, and `center` is the center of that box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextPlacement {
    pub center: [f32; 2],
    pub size: [f32; 2],
    pub bounds: [f32; 2],
    pub rotation: f32,
}

impl TextPlacement {
    /// Top-left corner of the bounding box.
    pub fn origin(&self) -> [f32; 2] {
        [
            self.center[0] - self.bounds[0] * 0.5,
            self.center[1] - self.bounds[1] * 0.5,
        ]
    }
}

/// Axis-aligned bounds of a `w` x `h` box rotated by `theta` radians.
pub fn rotated_bounds(w: f32, h: f32, theta: f32) -> [f32; 2] {
    let (sin, cos) = theta.sin_cos();
    [(w * cos).abs() + (h * sin).abs(), (w * sin).abs() + (h * cos).abs()]
}

/// Text whose top-left corner sits at `(x, y)`.
pub fn place_text(x: f32, y: f32, w: f32, h: f32) -> TextPlacement {
    TextPlacement {
        center: [x + w * 0.5, y + h * 0.5],
        size: [w, h],
        bounds: [w, h],
        rotation: 0.0,
    }
}

/// Text rotated by `theta` whose bounding box has its top-left at `(x, y)`.
pub fn place_text_rotated(x: f32, y: f32, w: f32, h: f32, theta: f32) -> TextPlacement {
    let bounds = rotated_bounds(w, h, theta);
    TextPlacement {
        center: [x + bounds[0] * 0.5, y + bounds[1] * 0.5],
        size: [w, h],
        bounds,
        rotation: theta,
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    use super::*;

    fn close(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-4 && (a[1] - b[1]).abs() < 1e-4
    }

    #[test]
    fn zero_rotation_matches_unrotated() {
        let plain = place_text(0.0, 0.0, 13.0, 15.0);
        let rotated = place_text_rotated(0.0, 0.0, 13.0, 15.0, 0.0);
        assert!(close(plain.bounds, rotated.bounds));
        assert!(close(plain.center, rotated.center));
        assert!(close(plain.origin(), rotated.origin()));
    }

    #[test]
    fn quarter_turn_swaps_bounds() {
        let p = place_text_rotated(0.0, 0.0, 13.0, 15.0, FRAC_PI_2);
        assert!(close(p.bounds, [15.0, 13.0]));
        assert!(close(p.center, [7.5, 6.5]));
        assert_eq!(p.size, [13.0, 15.0]);
        assert_eq!(p.rotation, FRAC_PI_2);
    }

    #[test]
    fn diagonal_bounds_grow() {
        let b = rotated_bounds(10.0, 10.0, FRAC_PI_4);
        let d = 10.0 * std::f32::consts::SQRT_2;
        assert!(close(b, [d, d]));
    }

    #[test]
    fn negative_angles_use_absolute_extents() {
        assert!(close(rotated_bounds(20.0, 4.0, -FRAC_PI_2), [4.0, 20.0]));
    }

    #[test]
    fn unrotated_center_is_offset_by_half_size() {
        let p = place_text(100.0, 40.0, 30.0, 12.0);
        assert_eq!(p.center, [115.0, 46.0]);
        assert_eq!(p.origin(), [100.0, 40.0]);
    }
}
