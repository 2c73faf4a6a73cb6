use bytemuck::{Pod, Zeroable};

/// Uniform block shared by every pipeline (80 bytes, 16-byte aligned).
///
///  offset  0  projection   [f32; 16]
///  offset 64  screen_size  [f32; 2]
///  offset 72  _pad         [f32; 2]
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ProjectionUniform {
    pub projection: [f32; 16],
    pub screen_size: [f32; 2],
    pub _pad: [f32; 2],
}

/// Orthographic pixel-space projection.
///
/// Maps `(0, 0)..(width, height)` in surface pixels to NDC with +Y pointing
/// down the screen. The matrix uses the row-vector convention: translation
/// sits in the last row (`m[12]`, `m[13]`), which is also how WGSL reads the
/// 16 floats as four columns.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    uniform: ProjectionUniform,
}

impl Projection {
    /// Builds the projection for a `width` x `height` pixel surface.
    ///
    /// Invalid dimensions yield a 1x1 projection; callers validate first.
    pub fn new(width: f32, height: f32) -> Self {
        let mut p = Self {
            uniform: ProjectionUniform {
                projection: [
                    1.0, 0.0, 0.0, 0.0, //
                    0.0, 1.0, 0.0, 0.0, //
                    0.0, 0.0, 1.0, 0.0, //
                    0.0, 0.0, 0.0, 1.0, //
                ],
                screen_size: [1.0, 1.0],
                _pad: [0.0; 2],
            },
        };
        if !p.resize(width, height) {
            p.resize(1.0, 1.0);
        }
        p
    }

    /// Recomputes the size-dependent cells in place.
    ///
    /// Returns `false` and leaves everything untouched when either dimension
    /// is non-positive or non-finite (transient layout states).
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        if !is_valid_extent(width, height) {
            return false;
        }

        let m = &mut self.uniform.projection;
        m[0] = 2.0 / width;
        m[5] = -2.0 / height;
        m[12] = -1.0;
        m[13] = 1.0;

        self.uniform.screen_size = [width, height];
        true
    }

    #[inline]
    pub fn matrix(&self) -> &[f32; 16] {
        &self.uniform.projection
    }

    #[inline]
    pub fn screen_size(&self) -> [f32; 2] {
        self.uniform.screen_size
    }

    #[inline]
    pub fn uniform(&self) -> &ProjectionUniform {
        &self.uniform
    }

    /// Applies the projection to a pixel-space point, returning NDC `(x, y)`.
    pub fn to_ndc(&self, x: f32, y: f32) -> (f32, f32) {
        let m = &self.uniform.projection;
        (x * m[0] + y * m[4] + m[12], x * m[1] + y * m[5] + m[13])
    }
}

#[inline]
pub(crate) fn is_valid_extent(width: f32, height: f32) -> bool {
    width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
}
