/// Renderer-facing context: device/queue, target format and the shared
/// projection binding (group 0 in every shader).
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub projection_layout: &'a wgpu::BindGroupLayout,
    pub projection_bind_group: &'a wgpu::BindGroup,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        projection_layout: &'a wgpu::BindGroupLayout,
        projection_bind_group: &'a wgpu::BindGroup,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            projection_layout,
            projection_bind_group,
        }
    }
}
