use anyhow::Result;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::config::EngineConfig;
use crate::device::{RenderContext, SurfaceRecovery};
use crate::error::RenderError;
use crate::paint::ColorInput;
use crate::render::{PrimitiveRenderer, PrimitiveStats, RenderCtx, TextRenderer};
use crate::text::TextStyle;

/// Result of one [`Engine::render_frame`] call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// The frame was drawn and presented.
    Rendered { draw_calls: u32 },
    /// The surface was not ready; nothing was drawn this time.
    Skipped,
}

/// Engine root: owns the render context and both renderers and exposes the
/// calls a host needs to drive a frame.
///
/// Per frame: `clear`, any number of `add_*` calls, then `render_frame`.
pub struct Engine<'w> {
    context: RenderContext<'w>,
    primitives: PrimitiveRenderer,
    text: TextRenderer,
    clear_color: wgpu::Color,
}

impl<'w> Engine<'w> {
    pub async fn new(window: &'w Window, config: EngineConfig) -> Result<Self> {
        let EngineConfig {
            gpu,
            clear_color,
            fonts,
            text_cache_warn_entries,
        } = config;

        let context = RenderContext::new(window, gpu).await?;
        if fonts.is_empty() {
            log::warn!("no fonts registered; text calls will fail");
        }

        let (primitives, text) = {
            let ctx = context.render_ctx();
            (
                PrimitiveRenderer::new(&ctx),
                TextRenderer::new(&ctx, fonts, text_cache_warn_entries),
            )
        };

        let [r, g, b, a] = clear_color.map(f64::from);
        Ok(Self {
            context,
            primitives,
            text,
            clear_color: wgpu::Color { r, g, b, a },
        })
    }

    #[inline]
    pub fn context(&self) -> &RenderContext<'w> {
        &self.context
    }

    #[inline]
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        self.context.render_ctx()
    }

    #[inline]
    pub fn primitives(&self) -> &PrimitiveRenderer {
        &self.primitives
    }

    #[inline]
    pub fn text(&self) -> &TextRenderer {
        &self.text
    }

    /// Current surface size in pixels.
    #[inline]
    pub fn screen_size(&self) -> [f32; 2] {
        self.context.screen_size()
    }

    pub fn set_clear_color(&mut self, color: impl Into<ColorInput>) {
        let [r, g, b, a] = color.into().to_rgba(1.0).map(f64::from);
        self.clear_color = wgpu::Color { r, g, b, a };
    }

    // ── host API ──────────────────────────────────────────────────────────

    pub fn add_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: impl Into<ColorInput>, alpha: f32) {
        self.primitives.add_rect(x, y, w, h, color, alpha);
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
        self.primitives.add_triangle(x0, y0, x1, y1, x2, y2, color, alpha);
    }

    pub fn add_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: impl Into<ColorInput>, alpha: f32) {
        self.primitives.add_line(x0, y0, x1, y1, color, alpha);
    }

    /// Queues `text` with its top-left at `(x, y)`. Rasterizes on a cache miss.
    pub fn add_text(&mut self, x: f32, y: f32, text: &str, style: &TextStyle) -> Result<(), RenderError> {
        let ctx = self.context.render_ctx();
        self.text.add_text(&ctx, x, y, text, style)
    }

    pub fn add_text_rotated(
        &mut self,
        x: f32,
        y: f32,
        text: &str,
        style: &TextStyle,
        rotation: f32,
    ) -> Result<(), RenderError> {
        let ctx = self.context.render_ctx();
        self.text.add_text_rotated(&ctx, x, y, text, style, rotation)
    }

    /// Empties every pending instance list. Caches and GPU buffers are kept.
    pub fn clear(&mut self) {
        self.primitives.clear();
        self.text.clear();
    }

    pub fn stats(&self) -> PrimitiveStats {
        self.primitives.stats()
    }

    pub fn handle_resize(&mut self, size: PhysicalSize<u32>) {
        self.context.handle_resize(size);
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Clears the surface, draws primitives then text in one pass, and presents.
    ///
    /// Surface hiccups skip the frame; an unrecoverable surface yields a fatal
    /// [`RenderError::Unavailable`].
    pub fn render_frame(&mut self) -> Result<FrameOutcome, RenderError> {
        let mut frame = match self.context.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                let reason = format!("surface error: {err}");
                return match self.context.handle_surface_error(err) {
                    SurfaceRecovery::Unavailable => Err(RenderError::unavailable(reason)),
                    SurfaceRecovery::Reconfigured | SurfaceRecovery::Skipped => Ok(FrameOutcome::Skipped),
                };
            }
        };

        let ctx = self.context.render_ctx();
        let draw_calls = {
            let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("genomeshader frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let primitives = self.primitives.render(&ctx, &mut pass)?;
            let text = self.text.render(&ctx, &mut pass)?;
            primitives + text
        };

        self.context.submit(frame);
        Ok(FrameOutcome::Rendered { draw_calls })
    }
}
