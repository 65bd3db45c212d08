use crate::coords::Viewport;

/// Device-side context for one frame.
///
/// Passed explicitly instead of living in a global so that several
/// engines (or tests) never share GPU state by accident.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Surface size in logical pixels.
    pub viewport: Viewport,
    /// Surface size in physical pixels; size depth attachments with this.
    pub physical_size: (u32, u32),
    pub scale_factor: f32,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        physical_size: (u32, u32),
        scale_factor: f32,
    ) -> Self {
        let (w, h) = physical_size;
        Self {
            device,
            queue,
            surface_format,
            viewport: Viewport::new(w as f32 / scale_factor, h as f32 / scale_factor),
            physical_size,
            scale_factor,
        }
    }

    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        self.viewport.aspect_ratio()
    }
}

/// Where the current frame's commands go.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    /// Surface view, already cleared to the engine's clear color.
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }
}
