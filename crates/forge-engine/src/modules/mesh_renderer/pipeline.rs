use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::graphics::{MeshData, MeshVertex, Shader, ShaderStage};
use crate::handle::Handle;
use crate::render::RenderCtx;

use super::uniform::{DRAW_UNIFORM_SIZE, UNIFORM_STRIDE};

pub(super) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// WGSL source and entry points copied out of the shader table.
pub(super) struct ShaderProgram {
    pub source: String,
    pub vertex: String,
    pub fragment: String,
}

impl ShaderProgram {
    pub fn from_shader(shader: &Shader) -> Option<Self> {
        Some(Self {
            source: shader.source().to_string(),
            vertex: shader.entry_point(ShaderStage::Vertex)?.to_string(),
            fragment: shader.entry_point(ShaderStage::Fragment)?.to_string(),
        })
    }
}

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // normal
        2 => Float32x2  // uv
    ];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRS,
    }
}

struct Uniforms {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    capacity: usize,
}

struct Depth {
    view: wgpu::TextureView,
    size: (u32, u32),
}

/// GPU objects of the mesh pass, rebuilt when the surface format or the
/// shader handle changes.
pub(super) struct MeshPipeline {
    format: wgpu::TextureFormat,
    shader: Handle<Shader>,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniforms: Option<Uniforms>,
    depth: Option<Depth>,
}

impl MeshPipeline {
    /// Compiles the program and builds the pipeline inside a validation
    /// error scope. WGSL that names the right entry points but does not
    /// validate comes back as `Err` instead of reaching the device's
    /// uncaptured-error handler.
    pub fn build(
        ctx: &RenderCtx<'_>,
        shader: Handle<Shader>,
        program: &ShaderProgram,
    ) -> Result<Self, wgpu::Error> {
        let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("forge mesh shader"),
            source: wgpu::ShaderSource::Wgsl(program.source.as_str().into()),
        });

        let bind_group_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("forge mesh bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(DRAW_UNIFORM_SIZE),
                    },
                    count: None,
                }],
            });

        let layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("forge mesh pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("forge mesh pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: Some(program.vertex.as_str()),
                    compilation_options: Default::default(),
                    buffers: &[vertex_layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &module,
                    entry_point: Some(program.fragment.as_str()),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(err);
        }
        log::debug!("mesh pipeline built for {:?} with {shader:?}", ctx.surface_format);

        Ok(Self {
            format: ctx.surface_format,
            shader,
            pipeline,
            bind_group_layout,
            uniforms: None,
            depth: None,
        })
    }

    pub fn matches(&self, format: wgpu::TextureFormat, shader: Handle<Shader>) -> bool {
        self.format == format && self.shader == shader
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    /// Depth attachment sized to the surface, recreated on resize.
    pub fn depth_view(&mut self, ctx: &RenderCtx<'_>) -> &wgpu::TextureView {
        let size = ctx.physical_size;
        if self.depth.as_ref().is_some_and(|d| d.size != size) {
            self.depth = None;
        }
        let depth = self.depth.get_or_insert_with(|| {
            let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
                label: Some("forge mesh depth"),
                size: wgpu::Extent3d {
                    width: size.0.max(1),
                    height: size.1.max(1),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });
            Depth {
                view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
                size,
            }
        });
        &depth.view
    }

    /// Uploads packed per-draw blocks, growing the buffer as needed, and
    /// returns the bind group to use with dynamic offsets.
    pub fn upload_uniforms(
        &mut self,
        ctx: &RenderCtx<'_>,
        draws: usize,
        bytes: &[u8],
    ) -> &wgpu::BindGroup {
        if self.uniforms.as_ref().is_some_and(|u| u.capacity < draws) {
            self.uniforms = None;
        }
        let layout = &self.bind_group_layout;
        let uniforms = self.uniforms.get_or_insert_with(|| {
            let capacity = draws.next_power_of_two().max(16);
            let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("forge mesh uniforms"),
                size: capacity as u64 * UNIFORM_STRIDE,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("forge mesh bind group"),
                layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &buffer,
                        offset: 0,
                        size: wgpu::BufferSize::new(DRAW_UNIFORM_SIZE),
                    }),
                }],
            });
            Uniforms {
                buffer,
                bind_group,
                capacity,
            }
        });
        ctx.queue.write_buffer(&uniforms.buffer, 0, bytes);
        &uniforms.bind_group
    }
}

/// Vertex and index buffers for one entity's mesh.
pub(super) struct GpuMesh {
    source: Arc<MeshData>,
    pub vertices: wgpu::Buffer,
    pub indices: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, source: Arc<MeshData>) -> Self {
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("forge mesh vbo"),
            contents: bytemuck::cast_slice(&source.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("forge mesh ibo"),
            contents: bytemuck::cast_slice(&source.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            index_count: source.index_count(),
            source,
            vertices,
            indices,
        }
    }

    /// True if these buffers were uploaded from `data`.
    pub fn is_from(&self, data: &Arc<MeshData>) -> bool {
        Arc::ptr_eq(&self.source, data)
    }
}
