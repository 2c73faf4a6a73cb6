//! Rounded-rectangle fragment model.
//!
//! `rect.wgsl` evaluates exactly this per fragment; the functions here are the
//! CPU reference used by tests and by hosts that need to predict coverage.
//!
//! The instance alpha is a mode selector, not a transparency:
//!
//! | alpha            | mode                                    |
//! |------------------|-----------------------------------------|
//! | `>= 0.99`        | fill at 70% plus a full 1 px stroke     |
//! | `(0.5, 0.99)`    | stroke only, scaled by alpha            |
//! | `<= 0.5`         | fill only, scaled by alpha              |
//!
//! Rects whose smaller side is under 6 px are flat-shaded in every mode.

pub const MAX_CORNER_RADIUS: f32 = 4.0;
pub const FLAT_SHADE_BELOW: f32 = 6.0;
pub const OPAQUE_NODE_ALPHA: f32 = 0.99;
pub const FILL_ONLY_MAX_ALPHA: f32 = 0.5;
pub const NODE_FILL_OPACITY: f32 = 0.7;

/// Which branch the fragment stage takes for an instance.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RectShadeMode {
    Flat,
    FillAndStroke,
    StrokeOnly,
    FillOnly,
}

impl RectShadeMode {
    pub fn select(size: [f32; 2], alpha: f32) -> Self {
        if size[0].min(size[1]) < FLAT_SHADE_BELOW {
            RectShadeMode::Flat
        } else if alpha >= OPAQUE_NODE_ALPHA {
            RectShadeMode::FillAndStroke
        } else if alpha > FILL_ONLY_MAX_ALPHA {
            RectShadeMode::StrokeOnly
        } else {
            RectShadeMode::FillOnly
        }
    }
}

#[inline]
pub fn corner_radius(size: [f32; 2]) -> f32 {
    MAX_CORNER_RADIUS.min(size[0].min(size[1]) * 0.5)
}

/// Signed distance from `p` (relative to the rect center) to a rounded box
/// with half extents `half` and corner radius `radius`. Negative inside.
pub fn rounded_box_sdf(p: [f32; 2], half: [f32; 2], radius: f32) -> f32 {
    let qx = p[0].abs() - half[0] + radius;
    let qy = p[1].abs() - half[1] + radius;
    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    outside + qx.max(qy).min(0.0) - radius
}

/// GLSL/WGSL `smoothstep`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Premultiplied output color for the fragment at `local` (pixels from the
/// rect center) of a rect of `size` with straight `color`.
pub fn shade_rect(local: [f32; 2], size: [f32; 2], color: [f32; 4]) -> [f32; 4] {
    let [r, g, b, a] = color;
    let mode = RectShadeMode::select(size, a);
    if mode == RectShadeMode::Flat {
        return [r * a, g * a, b * a, a];
    }

    let half = [size[0] * 0.5, size[1] * 0.5];
    let dist = rounded_box_sdf(local, half, corner_radius(size));

    let fill = 1.0 - smoothstep(-1.0, 0.0, dist);
    let stroke = 1.0 - smoothstep(0.5, 1.5, dist.abs());

    let alpha = match mode {
        RectShadeMode::FillAndStroke => (fill * NODE_FILL_OPACITY + stroke).min(1.0),
        RectShadeMode::StrokeOnly => stroke * a,
        RectShadeMode::FillOnly => fill * a,
        RectShadeMode::Flat => a,
    };
    [r * alpha, g * alpha, b * alpha, alpha]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn close(a: [f32; 4], b: [f32; 4]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < EPS)
    }

    // ── mode selection ────────────────────────────────────────────────────

    #[test]
    fn small_rect_is_flat_for_every_alpha() {
        for alpha in [0.0, 0.1, 0.5, 0.51, 0.7, 0.98, 0.99, 1.0] {
            assert_eq!(RectShadeMode::select([4.0, 4.0], alpha), RectShadeMode::Flat);
            for p in [[0.0, 0.0], [1.9, -1.9], [-2.0, 2.0]] {
                let c = [0.2, 0.4, 0.6, alpha];
                assert!(close(shade_rect(p, [4.0, 4.0], c), [0.2 * alpha, 0.4 * alpha, 0.6 * alpha, alpha]));
            }
        }
    }

    #[test]
    fn one_thin_side_is_enough_for_flat() {
        assert_eq!(RectShadeMode::select([200.0, 5.9], 1.0), RectShadeMode::Flat);
        assert_eq!(RectShadeMode::select([6.0, 6.0], 1.0), RectShadeMode::FillAndStroke);
    }

    #[test]
    fn alpha_thresholds() {
        let s = [20.0, 20.0];
        assert_eq!(RectShadeMode::select(s, 1.0), RectShadeMode::FillAndStroke);
        assert_eq!(RectShadeMode::select(s, 0.99), RectShadeMode::FillAndStroke);
        assert_eq!(RectShadeMode::select(s, 0.98), RectShadeMode::StrokeOnly);
        assert_eq!(RectShadeMode::select(s, 0.51), RectShadeMode::StrokeOnly);
        assert_eq!(RectShadeMode::select(s, 0.5), RectShadeMode::FillOnly);
        assert_eq!(RectShadeMode::select(s, 0.0), RectShadeMode::FillOnly);
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn radius_is_capped() {
        assert_eq!(corner_radius([100.0, 50.0]), 4.0);
        assert_eq!(corner_radius([100.0, 6.0]), 3.0);
    }

    #[test]
    fn sdf_sign() {
        let half = [10.0, 5.0];
        assert!(rounded_box_sdf([0.0, 0.0], half, 4.0) < 0.0);
        assert!((rounded_box_sdf([10.0, 0.0], half, 4.0)).abs() < EPS);
        assert!(rounded_box_sdf([12.0, 0.0], half, 4.0) > 0.0);
        // Corners are rounded: the sharp corner point lies outside.
        assert!(rounded_box_sdf([10.0, 5.0], half, 4.0) > 0.0);
    }

    // ── modes ─────────────────────────────────────────────────────────────

    #[test]
    fn opaque_node_interior_is_seventy_percent() {
        let out = shade_rect([0.0, 0.0], [40.0, 20.0], [1.0, 0.0, 0.0, 1.0]);
        assert!(close(out, [0.7, 0.0, 0.0, 0.7]));
    }

    #[test]
    fn opaque_node_edge_is_clamped_to_one() {
        // Just inside the edge: fill partially on, stroke fully on.
        let out = shade_rect([19.5, 0.0], [40.0, 20.0], [1.0, 1.0, 1.0, 1.0]);
        assert!(close(out, [1.0, 1.0, 1.0, 1.0]));
    }

    #[test]
    fn stroke_only_has_empty_interior() {
        let size = [40.0, 20.0];
        let inside = shade_rect([0.0, 0.0], size, [0.0, 0.0, 1.0, 0.7]);
        assert!(close(inside, [0.0; 4]));

        let edge = shade_rect([20.0, 0.0], size, [0.0, 0.0, 1.0, 0.7]);
        assert!(close(edge, [0.0, 0.0, 0.7, 0.7]));
    }

    #[test]
    fn fill_only_is_scaled_interior() {
        let size = [40.0, 20.0];
        let inside = shade_rect([0.0, 0.0], size, [0.0, 1.0, 0.0, 0.3]);
        assert!(close(inside, [0.0, 0.3, 0.0, 0.3]));

        let outside = shade_rect([25.0, 0.0], size, [0.0, 1.0, 0.0, 0.3]);
        assert!(close(outside, [0.0; 4]));
    }

    #[test]
    fn output_is_premultiplied() {
        for alpha in [1.0, 0.8, 0.3] {
            let out = shade_rect([19.0, 3.0], [40.0, 20.0], [0.5, 0.25, 1.0, alpha]);
            assert!((out[0] - 0.5 * out[3]).abs() < EPS);
            assert!((out[1] - 0.25 * out[3]).abs() < EPS);
            assert!((out[2] - out[3]).abs() < EPS);
        }
    }
}
