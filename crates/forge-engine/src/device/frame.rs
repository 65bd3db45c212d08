/// An acquired surface texture plus the encoder recording into it.
///
/// Presented when passed to [`Gpu::submit`](super::Gpu::submit). Holding on
/// to it blocks acquisition of the next frame.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
