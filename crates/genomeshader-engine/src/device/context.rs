use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::error::RenderError;
use crate::render::RenderCtx;

use super::projection::{Projection, ProjectionUniform};
use super::resize::ResizeDebouncer;
use super::surface;
use super::surface::SurfaceRecovery;
use super::GpuInit;

/// The acquired surface texture for one frame and the encoder recording into it.
///
/// Must be handed back through [`RenderContext::submit`] before the next
/// [`RenderContext::begin_frame`].
pub struct SurfaceFrame {
    texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// Surface and projection manager.
///
/// Owns the wgpu device/queue, the window surface, and the projection uniform
/// shared by every pipeline. Coordinates handed to the renderers are surface
/// pixels (device-pixel-scaled), origin top-left, +Y down.
pub struct RenderContext<'w> {
    surface: wgpu::Surface<'w>,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    projection: Projection,
    uniform_buffer: wgpu::Buffer,
    projection_layout: wgpu::BindGroupLayout,
    projection_bind_group: wgpu::BindGroup,

    resize: ResizeDebouncer,
}

impl<'w> RenderContext<'w> {
    /// Acquires adapter + device for `window` and builds the initial projection.
    ///
    /// Failing to obtain a surface, adapter, device, or surface format is a
    /// capability-missing condition: the returned error's root cause is
    /// [`RenderError::Unavailable`] and the caller should not retry.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();

        let GpuInit {
            prefer_srgb,
            power_preference,
            present_mode,
            alpha_mode,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| RenderError::unavailable(format!("no drawable surface: {e}")))
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RenderError::unavailable(format!("no compatible GPU adapter: {e}")))
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("genomeshader device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| RenderError::unavailable(format!("device request failed: {e}")))
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps, prefer_srgb)
            .ok_or_else(|| RenderError::unavailable("surface reports no formats"))
            .context("no supported surface formats")?;
        let alpha_mode = surface::choose_alpha_mode(&caps, alpha_mode);
        log::info!("surface format: {format:?}, alpha mode: {alpha_mode:?}");

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency,
        };
        surface.configure(&device, &config);

        let projection = Projection::new(config.width as f32, config.height as f32);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("genomeshader projection ubo"),
            size: std::mem::size_of::<ProjectionUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&uniform_buffer, 0, bytemuck::bytes_of(projection.uniform()));

        let projection_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("genomeshader projection bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ProjectionUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        // The uniform buffer is rewritten on resize, never reallocated, so this
        // binding set lives as long as the context.
        let projection_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("genomeshader projection bind group"),
            layout: &projection_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Ok(Self {
            surface,
            adapter,
            device,
            queue,
            config,
            projection,
            uniform_buffer,
            projection_layout,
            projection_bind_group,
            resize: ResizeDebouncer::new(),
        })
    }

    /// Renderer-facing view of the device and shared projection binding.
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(
            &self.device,
            &self.queue,
            self.config.format,
            &self.projection_layout,
            &self.projection_bind_group,
        )
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    #[inline]
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    #[inline]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Current screen size in surface pixels.
    #[inline]
    pub fn screen_size(&self) -> [f32; 2] {
        self.projection.screen_size()
    }

    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Records a new surface size. Cheap; safe to call for every layout event.
    ///
    /// The recompute is deferred to the next [`begin_frame`](Self::begin_frame)
    /// and only the latest request per frame is applied.
    pub fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        self.request_resize(new_size.width as f32, new_size.height as f32);
    }

    /// Like [`handle_resize`](Self::handle_resize) for hosts measuring in floats.
    pub fn request_resize(&mut self, width: f32, height: f32) {
        self.resize.request(width, height);
    }

    /// Applies the pending resize, if any. Returns true when the projection changed.
    ///
    /// Non-positive or non-finite sizes are skipped and the previous projection
    /// stays in effect.
    pub fn apply_pending_resize(&mut self) -> bool {
        let Some((w, h)) = self.resize.apply_to(&mut self.projection) else {
            return false;
        };

        if w != self.config.width || h != self.config.height {
            self.config.width = w;
            self.config.height = h;
            self.surface.configure(&self.device, &self.config);
        }

        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(self.projection.uniform()));
        log::debug!(
            "surface resized to {w}x{h} ({} superseded requests so far)",
            self.resize.superseded()
        );
        true
    }

    /// Resize requests replaced by a later one before a frame applied them.
    #[inline]
    pub fn superseded_resizes(&self) -> u64 {
        self.resize.superseded()
    }

    /// Applies any pending resize, then acquires the next surface texture.
    pub fn begin_frame(&mut self) -> std::result::Result<SurfaceFrame, wgpu::SurfaceError> {
        self.apply_pending_resize();

        let texture = self.surface.get_current_texture()?;
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("genomeshader frame encoder"),
            });

        Ok(SurfaceFrame { texture, view, encoder })
    }

    /// Submits the frame's commands and presents it.
    pub fn submit(&self, frame: SurfaceFrame) {
        let SurfaceFrame { texture, view, encoder } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        texture.present();
    }

    /// Reconfigures the surface if `err` was a lost or stale surface.
    pub fn handle_surface_error(&mut self, err: wgpu::SurfaceError) -> SurfaceRecovery {
        surface::recover_surface_error(&self.surface, &self.device, &self.config, err)
    }
}
