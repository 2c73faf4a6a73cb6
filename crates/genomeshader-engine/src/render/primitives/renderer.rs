use crate::error::RenderError;
use crate::paint::ColorInput;
use crate::render::buffer::InstanceBuffer;
use crate::render::common::{
    create_pipeline, create_quad_vbo, create_shader, premul_alpha_blend, straight_alpha_blend,
    PipelineSpec, QuadVertex,
};
use crate::render::RenderCtx;

use super::batch::{
    LineInstance, PrimitiveBatches, PrimitiveKind, PrimitiveStats, RectInstance, TriangleInstance,
};

/// Pipeline plus instance buffer for one primitive kind.
struct KindState {
    pipeline: wgpu::RenderPipeline,
    instances: InstanceBuffer,
}

/// Instanced renderer for rectangles, triangles and lines.
///
/// Pipelines and the static quad are built once in [`new`](Self::new);
/// instance buffers grow on demand and survive [`clear`](Self::clear).
pub struct PrimitiveRenderer {
    batches: PrimitiveBatches,
    quad_vbo: wgpu::Buffer,
    rect: KindState,
    triangle: KindState,
    line: KindState,
}

impl PrimitiveRenderer {
    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        let layouts = [ctx.projection_layout];

        let rect_shader = create_shader(ctx, "genomeshader rect shader", include_str!("../shaders/rect.wgsl"));
        let rect = create_pipeline(
            ctx,
            PipelineSpec {
                label: "genomeshader rect pipeline",
                shader: &rect_shader,
                bind_group_layouts: &layouts,
                buffers: &[QuadVertex::layout(), RectInstance::layout()],
                blend: premul_alpha_blend(),
                topology: wgpu::PrimitiveTopology::TriangleStrip,
            },
        );

        let triangle_shader =
            create_shader(ctx, "genomeshader triangle shader", include_str!("../shaders/triangle.wgsl"));
        let triangle = create_pipeline(
            ctx,
            PipelineSpec {
                label: "genomeshader triangle pipeline",
                shader: &triangle_shader,
                bind_group_layouts: &layouts,
                buffers: &[TriangleInstance::layout()],
                blend: straight_alpha_blend(),
                topology: wgpu::PrimitiveTopology::TriangleList,
            },
        );

        let line_shader = create_shader(ctx, "genomeshader line shader", include_str!("../shaders/line.wgsl"));
        let line = create_pipeline(
            ctx,
            PipelineSpec {
                label: "genomeshader line pipeline",
                shader: &line_shader,
                bind_group_layouts: &layouts,
                buffers: &[LineInstance::layout()],
                blend: straight_alpha_blend(),
                topology: wgpu::PrimitiveTopology::LineList,
            },
        );

        let kind = |pipeline, k: PrimitiveKind| KindState {
            pipeline,
            instances: InstanceBuffer::new(k.label()),
        };

        Self {
            batches: PrimitiveBatches::new(),
            quad_vbo: create_quad_vbo(ctx, "genomeshader rect quad vbo"),
            rect: kind(rect, PrimitiveKind::Rect),
            triangle: kind(triangle, PrimitiveKind::Triangle),
            line: kind(line, PrimitiveKind::Line),
        }
    }

    pub fn add_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: impl Into<ColorInput>, alpha: f32) {
        self.batches.add_rect(x, y, w, h, color, alpha);
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
        self.batches.add_triangle(x0, y0, x1, y1, x2, y2, color, alpha);
    }

    pub fn add_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: impl Into<ColorInput>, alpha: f32) {
        self.batches.add_line(x0, y0, x1, y1, color, alpha);
    }

    /// Drops queued instances. GPU buffers and pipelines are kept.
    pub fn clear(&mut self) {
        self.batches.clear();
    }

    pub fn stats(&self) -> PrimitiveStats {
        self.batches.stats()
    }

    #[inline]
    pub fn batches(&self) -> &PrimitiveBatches {
        &self.batches
    }

    /// Current instance-buffer capacity in bytes for `kind`.
    pub fn buffer_capacity(&self, kind: PrimitiveKind) -> u64 {
        self.state(kind).instances.capacity()
    }

    fn state(&self, kind: PrimitiveKind) -> &KindState {
        match kind {
            PrimitiveKind::Rect => &self.rect,
            PrimitiveKind::Triangle => &self.triangle,
            PrimitiveKind::Line => &self.line,
        }
    }

    /// Uploads every non-empty batch and records one instanced draw per kind,
    /// rects first, then triangles, then lines.
    ///
    /// Returns the number of draw calls recorded.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, pass: &mut wgpu::RenderPass<'_>) -> Result<u32, RenderError> {
        let mut draw_calls = 0;

        for draw in self.batches.draws() {
            let state = match draw.kind {
                PrimitiveKind::Rect => &mut self.rect,
                PrimitiveKind::Triangle => &mut self.triangle,
                PrimitiveKind::Line => &mut self.line,
            };
            let buffer = state.instances.upload(ctx, draw.bytes)?;

            pass.set_pipeline(&state.pipeline);
            pass.set_bind_group(0, ctx.projection_bind_group, &[]);

            let vertices = 0..draw.kind.vertices_per_instance();
            let instances = 0..draw.instances;
            match draw.kind {
                PrimitiveKind::Rect => {
                    pass.set_vertex_buffer(0, self.quad_vbo.slice(..));
                    pass.set_vertex_buffer(1, buffer.slice(..draw.bytes.len() as u64));
                }
                PrimitiveKind::Triangle | PrimitiveKind::Line => {
                    pass.set_vertex_buffer(0, buffer.slice(..draw.bytes.len() as u64));
                }
            }
            pass.draw(vertices, instances);
            draw_calls += 1;
        }

        Ok(draw_calls)
    }
}
