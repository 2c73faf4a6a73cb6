use std::cell::OnceCell;
use std::rc::Rc;

use crate::error::RenderError;
use crate::render::buffer::InstanceBuffer;
use crate::render::common::{
    create_pipeline, create_quad_vbo, create_shader, premul_alpha_blend, PipelineSpec, QuadVertex,
    QUAD_STRIP_VERTICES,
};
use crate::render::RenderCtx;
use crate::text::{
    place_text, place_text_rotated, CachedText, RasterImage, TextBatch, TextCache, TextInstance,
    TextQuadInstance, TextRasterizer, TextStyle,
};

/// GPU texture holding one cached text raster.
///
/// The texture + sampler binding set is created on first draw and reused
/// for the life of the cache entry.
#[derive(Debug)]
pub struct TextTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    bind_group: OnceCell<wgpu::BindGroup>,
}

impl TextTexture {
    #[inline]
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    fn bind_group(&self, ctx: &RenderCtx<'_>, layout: &wgpu::BindGroupLayout, sampler: &wgpu::Sampler) -> &wgpu::BindGroup {
        self.bind_group.get_or_init(|| {
            ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("genomeshader text bind group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&self.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            })
        })
    }
}

/// Creates a texture sized exactly to `image` and writes its pixels.
///
/// The write is queued before any later submit, so the texture is ready for
/// every draw recorded after this returns.
fn upload_raster(ctx: &RenderCtx<'_>, image: &RasterImage) -> Result<TextTexture, RenderError> {
    let max = ctx.device.limits().max_texture_dimension_2d;
    if image.width > max || image.height > max {
        return Err(RenderError::TextureTooLarge {
            width: image.width,
            height: image.height,
            max,
        });
    }

    let size = wgpu::Extent3d {
        width: image.width,
        height: image.height,
        depth_or_array_layers: 1,
    };
    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("genomeshader text texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    ctx.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &image.pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(image.bytes_per_row()),
            rows_per_image: Some(image.height),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    Ok(TextTexture {
        texture,
        view,
        bind_group: OnceCell::new(),
    })
}

/// Renders cached text rasters as instanced, texture-grouped quads.
pub struct TextRenderer {
    pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    quad_vbo: wgpu::Buffer,
    instances: InstanceBuffer,

    cache: TextCache<TextTexture>,
    batch: TextBatch<TextTexture>,
    rasterizer: Box<dyn TextRasterizer>,
}

impl TextRenderer {
    pub fn new(ctx: &RenderCtx<'_>, rasterizer: impl TextRasterizer + 'static, cache_warn_entries: usize) -> Self {
        let texture_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("genomeshader text bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let shader = create_shader(ctx, "genomeshader text shader", include_str!("shaders/text.wgsl"));
        let pipeline = create_pipeline(
            ctx,
            PipelineSpec {
                label: "genomeshader text pipeline",
                shader: &shader,
                bind_group_layouts: &[ctx.projection_layout, &texture_layout],
                buffers: &[QuadVertex::layout(), TextQuadInstance::layout()],
                blend: premul_alpha_blend(),
                topology: wgpu::PrimitiveTopology::TriangleStrip,
            },
        );

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("genomeshader text sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Self {
            pipeline,
            texture_layout,
            sampler,
            quad_vbo: create_quad_vbo(ctx, "genomeshader text quad vbo"),
            instances: InstanceBuffer::new("genomeshader text instances"),
            cache: TextCache::new(cache_warn_entries),
            batch: TextBatch::new(),
            rasterizer: Box::new(rasterizer),
        }
    }

    /// Cached texture for `text` in `style`, rasterizing and uploading on a miss.
    pub fn render_text_to_texture(
        &mut self,
        ctx: &RenderCtx<'_>,
        text: &str,
        style: &TextStyle,
    ) -> Result<Rc<CachedText<TextTexture>>, RenderError> {
        let max_dimension = ctx.device.limits().max_texture_dimension_2d;
        self.cache.get_or_rasterize(self.rasterizer.as_ref(), text, style, max_dimension, |image| {
            upload_raster(ctx, image)
        })
    }

    /// Queues `text` with its top-left corner at `(x, y)`.
    pub fn add_text(&mut self, ctx: &RenderCtx<'_>, x: f32, y: f32, text: &str, style: &TextStyle) -> Result<(), RenderError> {
        let entry = self.render_text_to_texture(ctx, text, style)?;
        let placement = place_text(x, y, entry.width() as f32, entry.height() as f32);
        self.batch.push(TextInstance::new(entry, placement));
        Ok(())
    }

    /// Queues `text` rotated by `rotation` radians about its center, with the
    /// rotated bounding box's top-left corner at `(x, y)`.
    pub fn add_text_rotated(
        &mut self,
        ctx: &RenderCtx<'_>,
        x: f32,
        y: f32,
        text: &str,
        style: &TextStyle,
        rotation: f32,
    ) -> Result<(), RenderError> {
        let entry = self.render_text_to_texture(ctx, text, style)?;
        let placement = place_text_rotated(x, y, entry.width() as f32, entry.height() as f32, rotation);
        self.batch.push(TextInstance::new(entry, placement));
        Ok(())
    }

    /// Drops queued instances; the texture cache is kept.
    pub fn clear(&mut self) {
        self.batch.clear();
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.batch.len()
    }

    #[inline]
    pub fn cache(&self) -> &TextCache<TextTexture> {
        &self.cache
    }

    /// Uploads all queued quads at once and records one instanced draw per
    /// texture. Returns the number of draw calls recorded.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, pass: &mut wgpu::RenderPass<'_>) -> Result<u32, RenderError> {
        if self.batch.is_empty() {
            return Ok(0);
        }

        let grouped = self.batch.grouped();
        let bytes: &[u8] = bytemuck::cast_slice(&grouped.quads);
        let buffer = self.instances.upload(ctx, bytes)?;

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, ctx.projection_bind_group, &[]);
        pass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        pass.set_vertex_buffer(1, buffer.slice(..bytes.len() as u64));

        let mut draw_calls = 0;
        for group in &grouped.groups {
            let bind_group = group.entry.texture().bind_group(ctx, &self.texture_layout, &self.sampler);
            pass.set_bind_group(1, bind_group, &[]);
            pass.draw(0..QUAD_STRIP_VERTICES, group.instances.clone());
            draw_calls += 1;
        }

        Ok(draw_calls)
    }
}
