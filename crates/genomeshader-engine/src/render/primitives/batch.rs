use bytemuck::{Pod, Zeroable};

use crate::paint::ColorInput;

// ── instance records ──────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct RectInstance {
    pub center: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
}

impl RectInstance {
    // Location 0 is the quad corner.
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        1 => Float32x2, // center
        2 => Float32x2, // size
        3 => Float32x4  // color
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RectInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TriangleInstance {
    pub v0: [f32; 2],
    pub v1: [f32; 2],
    pub v2: [f32; 2],
    pub color: [f32; 4],
}

impl TriangleInstance {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x2,
        2 => Float32x2,
        3 => Float32x4
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TriangleInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LineInstance {
    pub start: [f32; 2],
    pub end: [f32; 2],
    pub color: [f32; 4],
}

impl LineInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // start
        1 => Float32x2, // end
        2 => Float32x4  // color
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

// ── kinds ─────────────────────────────────────────────────────────────────

/// Closed set of primitive kinds. Declaration order is draw order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PrimitiveKind {
    Rect,
    Triangle,
    Line,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 3] = [PrimitiveKind::Rect, PrimitiveKind::Triangle, PrimitiveKind::Line];

    /// Vertices emitted per instance.
    pub const fn vertices_per_instance(self) -> u32 {
        match self {
            PrimitiveKind::Rect => 4,
            PrimitiveKind::Triangle => 3,
            PrimitiveKind::Line => 2,
        }
    }

    pub const fn stride(self) -> usize {
        match self {
            PrimitiveKind::Rect => std::mem::size_of::<RectInstance>(),
            PrimitiveKind::Triangle => std::mem::size_of::<TriangleInstance>(),
            PrimitiveKind::Line => std::mem::size_of::<LineInstance>(),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PrimitiveKind::Rect => "genomeshader rect instances",
            PrimitiveKind::Triangle => "genomeshader triangle instances",
            PrimitiveKind::Line => "genomeshader line instances",
        }
    }
}

/// Per-kind instance counts.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct PrimitiveStats {
    pub rects: usize,
    pub triangles: usize,
    pub lines: usize,
    pub total: usize,
}

/// One instanced draw: which kind, how many instances, and their bytes.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveDraw<'a> {
    pub kind: PrimitiveKind,
    pub instances: u32,
    pub bytes: &'a [u8],
}

// ── batches ───────────────────────────────────────────────────────────────

/// CPU side of the primitive renderer: one ordered instance list per kind.
///
/// Coordinates are surface pixels, origin top-left.
#[derive(Debug, Default, Clone)]
pub struct PrimitiveBatches {
    rects: Vec<RectInstance>,
    triangles: Vec<TriangleInstance>,
    lines: Vec<LineInstance>,
}

impl PrimitiveBatches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an `x, y, w, h` rectangle. Stored by center.
    ///
    /// The color's alpha selects the shading mode (see `shading`).
    pub fn add_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: impl Into<ColorInput>, alpha: f32) {
        self.rects.push(RectInstance {
            center: [x + w / 2.0, y + h / 2.0],
            size: [w, h],
            color: color.into().to_rgba(alpha),
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_triangle(
        &mut self,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: impl Into<ColorInput>,
        alpha: f32,
    ) {
        self.triangles.push(TriangleInstance {
            v0: [x0, y0],
            v1: [x1, y1],
            v2: [x2, y2],
            color: color.into().to_rgba(alpha),
        });
    }

    pub fn add_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: impl Into<ColorInput>, alpha: f32) {
        self.lines.push(LineInstance {
            start: [x0, y0],
            end: [x1, y1],
            color: color.into().to_rgba(alpha),
        });
    }

    pub fn clear(&mut self) {
        self.rects.clear();
        self.triangles.clear();
        self.lines.clear();
    }

    pub fn stats(&self) -> PrimitiveStats {
        let (rects, triangles, lines) = (self.rects.len(), self.triangles.len(), self.lines.len());
        PrimitiveStats {
            rects,
            triangles,
            lines,
            total: rects + triangles + lines,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stats().total == 0
    }

    #[inline]
    pub fn rects(&self) -> &[RectInstance] {
        &self.rects
    }

    #[inline]
    pub fn triangles(&self) -> &[TriangleInstance] {
        &self.triangles
    }

    #[inline]
    pub fn lines(&self) -> &[LineInstance] {
        &self.lines
    }

    fn bytes_of(&self, kind: PrimitiveKind) -> (usize, &[u8]) {
        match kind {
            PrimitiveKind::Rect => (self.rects.len(), bytemuck::cast_slice(&self.rects)),
            PrimitiveKind::Triangle => (self.triangles.len(), bytemuck::cast_slice(&self.triangles)),
            PrimitiveKind::Line => (self.lines.len(), bytemuck::cast_slice(&self.lines)),
        }
    }

    /// Serialized draws for every non-empty kind, rects then triangles then lines.
    pub fn draws(&self) -> Vec<PrimitiveDraw<'_>> {
        PrimitiveKind::ALL
            .into_iter()
            .filter_map(|kind| {
                let (count, bytes) = self.bytes_of(kind);
                (count > 0).then_some(PrimitiveDraw {
                    kind,
                    instances: count as u32,
                    bytes,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 4], b: [f32; 4]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-6)
    }

    // ── stats ─────────────────────────────────────────────────────────────

    #[test]
    fn stats_match_calls() {
        let mut b = PrimitiveBatches::new();
        for i in 0..5 {
            b.add_rect(i as f32, 0.0, 10.0, 10.0, "#000000", 1.0);
        }
        b.add_triangle(0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0xFF0000u32, 1.0);
        b.add_triangle(0.0, 0.0, 2.0, 0.0, 0.0, 2.0, 0xFF0000u32, 1.0);
        b.add_line(0.0, 0.0, 5.0, 5.0, [0.0, 0.0, 1.0], 1.0);

        assert_eq!(
            b.stats(),
            PrimitiveStats {
                rects: 5,
                triangles: 2,
                lines: 1,
                total: 8
            }
        );
    }

    #[test]
    fn stats_zero_after_clear() {
        let mut b = PrimitiveBatches::new();
        b.add_rect(0.0, 0.0, 1.0, 1.0, 0x123456u32, 1.0);
        b.add_line(0.0, 0.0, 1.0, 1.0, 0x123456u32, 1.0);
        b.clear();
        assert_eq!(b.stats(), PrimitiveStats::default());
        assert!(b.is_empty());
    }

    #[test]
    fn stats_do_not_mutate() {
        let mut b = PrimitiveBatches::new();
        b.add_rect(0.0, 0.0, 1.0, 1.0, 0x123456u32, 1.0);
        assert_eq!(b.stats(), b.stats());
        assert_eq!(b.rects().len(), 1);
    }

    // ── serialization ─────────────────────────────────────────────────────

    #[test]
    fn rect_is_stored_by_center() {
        let mut b = PrimitiveBatches::new();
        b.add_rect(10.0, 10.0, 100.0, 50.0, "#336699", 1.0);

        let draws = b.draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].kind, PrimitiveKind::Rect);
        assert_eq!(draws[0].instances, 1);

        let written: &[RectInstance] = bytemuck::cast_slice(draws[0].bytes);
        assert_eq!(written[0].center, [60.0, 35.0]);
        assert_eq!(written[0].size, [100.0, 50.0]);
        assert!(close(written[0].color, [0.2, 0.4, 0.6, 1.0]));
    }

    #[test]
    fn strides_are_fixed_per_kind() {
        assert_eq!(PrimitiveKind::Rect.stride(), 32);
        assert_eq!(PrimitiveKind::Triangle.stride(), 40);
        assert_eq!(PrimitiveKind::Line.stride(), 32);

        let mut b = PrimitiveBatches::new();
        b.add_triangle(0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0u32, 1.0);
        b.add_triangle(0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0u32, 1.0);
        assert_eq!(b.draws()[0].bytes.len(), 2 * PrimitiveKind::Triangle.stride());
    }

    #[test]
    fn draw_order_is_rects_triangles_lines() {
        let mut b = PrimitiveBatches::new();
        b.add_line(0.0, 0.0, 1.0, 1.0, 0u32, 1.0);
        b.add_triangle(0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0u32, 1.0);
        b.add_rect(0.0, 0.0, 1.0, 1.0, 0u32, 1.0);

        let kinds: Vec<_> = b.draws().iter().map(|d| d.kind).collect();
        assert_eq!(kinds, PrimitiveKind::ALL.to_vec());
    }

    #[test]
    fn empty_kinds_are_skipped() {
        let mut b = PrimitiveBatches::new();
        b.add_line(0.0, 0.0, 100.0, 100.0, 0xFF0000u32, 1.0);
        let draws = b.draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].kind, PrimitiveKind::Line);
        assert_eq!(draws[0].instances, 1);
    }

    #[test]
    fn line_then_clear_draws_nothing() {
        let mut b = PrimitiveBatches::new();
        b.add_line(0.0, 0.0, 100.0, 100.0, 0xFF0000u32, 1.0);
        b.clear();
        assert!(b.draws().is_empty());
    }

    #[test]
    fn vertices_per_instance() {
        assert_eq!(PrimitiveKind::Rect.vertices_per_instance(), 4);
        assert_eq!(PrimitiveKind::Triangle.vertices_per_instance(), 3);
        assert_eq!(PrimitiveKind::Line.vertices_per_instance(), 2);
    }
}
