//! Depth-tested mesh pass over every entity with a mesh and a material.

mod pipeline;
mod uniform;

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crate::components::{MaterialComponent, MeshComponent, Position, Transform, model_matrix};
use crate::ecs::Entity;
use crate::event::{Event, EventHandler, TouchEvent, TouchKind};
use crate::graphics::{Camera, Material, Shader, ShaderError, ShaderLayout};
use crate::handle::Handle;
use crate::module::{DrawCtx, Module};
use crate::resource::Resources;

use pipeline::{GpuMesh, MeshPipeline, ShaderProgram};
use uniform::{DrawUniform, SurfaceTerms, UNIFORM_STRIDE, pack_draws};

/// WGSL used by [`MeshRenderer::new`].
pub const MESH_SHADER_WGSL: &str = include_str!("shaders/mesh.wgsl");

const ORBIT_SPEED: f32 = 0.015;
const PAN_SPEED: f32 = 0.008;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Warning {
    StaleShader,
    InvalidShader(Handle<Shader>),
    StaleMaterial(Handle<Material>),
    MissingMesh(Entity),
}

/// Draws `(MeshComponent, MaterialComponent)` entities through an orbit
/// camera, and steers that camera from touch gestures.
///
/// Entities whose mesh failed to load, or whose material handle went stale,
/// are skipped with a single warning each. GPU state is created on the first
/// draw and rebuilt when the surface format or the shader changes.
pub struct MeshRenderer {
    shader: Handle<Shader>,
    camera: RefCell<Camera>,
    pipeline: RefCell<Option<MeshPipeline>>,
    meshes: RefCell<HashMap<Entity, GpuMesh>>,
    warned: RefCell<HashSet<Warning>>,
}

impl MeshRenderer {
    /// Registers the stock mesh shader in `resources`.
    pub fn new(resources: &Resources) -> Result<Self, ShaderError> {
        let layout = ShaderLayout::render("vs_main", "fs_main");
        let shader = resources.load_shader("mesh", MESH_SHADER_WGSL, &layout)?;
        Ok(Self::with_shader(shader))
    }

    /// Uses an already loaded shader; it must bind vertex and fragment
    /// entry points compatible with the stock vertex layout and uniforms.
    pub fn with_shader(shader: Handle<Shader>) -> Self {
        Self {
            shader,
            camera: RefCell::new(Camera::default()),
            pipeline: RefCell::new(None),
            meshes: RefCell::new(HashMap::new()),
            warned: RefCell::new(HashSet::new()),
        }
    }

    pub fn shader(&self) -> Handle<Shader> {
        self.shader
    }

    /// Snapshot of the camera.
    pub fn camera(&self) -> Camera {
        self.camera.borrow().clone()
    }

    pub fn set_camera(&self, camera: Camera) {
        *self.camera.borrow_mut() = camera;
    }

    /// Logs `message` the first time `warning` is raised. Returns true if
    /// it was new.
    fn warn_once(&self, warning: Warning, message: impl FnOnce() -> String) -> bool {
        let new = self.warned.borrow_mut().insert(warning);
        if new {
            log::warn!("{}", message());
        }
        new
    }

    /// Marks `shader` as unusable so the pipeline is not rebuilt from it
    /// every frame.
    fn reject_shader(&self, shader: Handle<Shader>, reason: impl std::fmt::Display) {
        self.warn_once(Warning::InvalidShader(shader), || {
            format!("mesh shader {shader:?} failed validation; mesh pass skipped: {reason}")
        });
    }

    fn is_rejected(&self, shader: Handle<Shader>) -> bool {
        self.warned.borrow().contains(&Warning::InvalidShader(shader))
    }

    /// Forgets per-entity and per-material warnings that did not recur in
    /// the last pass, so the set tracks only live problems.
    fn prune_warnings(&self, active: &HashSet<Warning>) {
        self.warned.borrow_mut().retain(|w| match w {
            Warning::StaleShader | Warning::InvalidShader(_) => true,
            Warning::StaleMaterial(_) | Warning::MissingMesh(_) => active.contains(w),
        });
    }

    /// Applies a gesture to the camera. Returns true if it was consumed.
    fn steer(&self, touch: &TouchEvent) -> bool {
        let mut camera = self.camera.borrow_mut();
        match touch.kind {
            TouchKind::Drag => {
                camera.orbit(-touch.delta.x * ORBIT_SPEED, touch.delta.y * ORBIT_SPEED);
                true
            }
            TouchKind::Scale => {
                camera.zoom(touch.scale);
                true
            }
            TouchKind::Translate => {
                camera.pan(-touch.delta.x * PAN_SPEED, touch.delta.y * PAN_SPEED);
                true
            }
            TouchKind::Rotate => {
                camera.orbit(touch.rotation, 0.0);
                true
            }
            TouchKind::Resize => {
                let size = touch.position();
                if size.y > 0.0 {
                    camera.set_aspect_ratio(size.x / size.y);
                }
                false
            }
            TouchKind::Tap => false,
        }
    }

    fn ensure_pipeline(&self, ctx: &DrawCtx<'_, '_>) -> bool {
        let shader = self.shader;
        let stale = || {
            self.warn_once(Warning::StaleShader, || {
                format!("mesh shader {shader:?} is gone or lacks render entry points; mesh pass skipped")
            });
            false
        };

        let mut slot = self.pipeline.borrow_mut();
        if !ctx.resources.shaders().contains(shader) {
            *slot = None;
            return stale();
        }
        if self.is_rejected(shader) {
            *slot = None;
            return false;
        }
        if slot
            .as_ref()
            .is_some_and(|p| p.matches(ctx.render.surface_format, shader))
        {
            return true;
        }

        let program = ctx
            .resources
            .shaders()
            .read(shader, ShaderProgram::from_shader)
            .flatten();
        let Some(program) = program else {
            return stale();
        };

        match MeshPipeline::build(ctx.render, shader, &program) {
            Ok(pipeline) => {
                *slot = Some(pipeline);
                true
            }
            Err(err) => {
                *slot = None;
                self.reject_shader(shader, err);
                false
            }
        }
    }

    /// Resolves every drawable entity into a uniform block and makes sure its
    /// mesh is resident. Returns the entities in draw order.
    fn collect(&self, ctx: &DrawCtx<'_, '_>) -> (Vec<Entity>, Vec<DrawUniform>) {
        let view_proj = self.camera.borrow().view_projection();
        let registry = ctx.scene.registry();
        let mut meshes = self.meshes.borrow_mut();

        let mut entities = Vec::new();
        let mut draws = Vec::new();
        let mut active = HashSet::new();
        let query = ctx.scene.view::<(MeshComponent, MaterialComponent)>();
        for (entity, (mesh, material)) in query.with_components() {
            let Some(data) = mesh.mesh.as_ref().filter(|m| !m.is_empty()) else {
                active.insert(Warning::MissingMesh(entity));
                self.warn_once(Warning::MissingMesh(entity), || {
                    format!("{entity} has no mesh data for `{}`; not drawn", mesh.name)
                });
                continue;
            };

            let handle = material.material;
            let Some(terms) = ctx.resources.materials().read(handle, SurfaceTerms::from_material) else {
                active.insert(Warning::StaleMaterial(handle));
                self.warn_once(Warning::StaleMaterial(handle), || {
                    format!("material {handle:?} used by {entity} is stale; not drawn")
                });
                continue;
            };

            if !meshes.get(&entity).is_some_and(|g| g.is_from(data)) {
                meshes.insert(entity, GpuMesh::upload(ctx.render.device, data.clone()));
            }

            let model = model_matrix(
                registry.get_component::<Position>(entity),
                registry.get_component::<Transform>(entity),
            );
            entities.push(entity);
            draws.push(terms.uniform(view_proj, model));
        }

        let drawn: HashSet<Entity> = entities.iter().copied().collect();
        meshes.retain(|e, _| drawn.contains(e));
        self.prune_warnings(&active);
        (entities, draws)
    }
}

impl Module for MeshRenderer {
    fn name(&self) -> &str {
        "mesh-renderer"
    }

    fn draw(&self, ctx: &mut DrawCtx<'_, '_>) {
        if !self.ensure_pipeline(ctx) {
            return;
        }

        let (entities, draws) = self.collect(ctx);
        if draws.is_empty() {
            return;
        }

        let mut slot = self.pipeline.borrow_mut();
        let Some(pipeline) = slot.as_mut() else {
            return;
        };
        let depth = pipeline.depth_view(ctx.render).clone();
        let bind_group = pipeline
            .upload_uniforms(ctx.render, draws.len(), &pack_draws(&draws))
            .clone();
        let meshes = self.meshes.borrow();

        let target = &mut *ctx.target;
        let mut pass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("forge mesh pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        pass.set_pipeline(pipeline.pipeline());
        for (i, entity) in entities.iter().enumerate() {
            let Some(mesh) = meshes.get(entity) else {
                continue;
            };
            let offset = (i as u64 * UNIFORM_STRIDE) as u32;
            pass.set_bind_group(0, &bind_group, &[offset]);
            pass.set_vertex_buffer(0, mesh.vertices.slice(..));
            pass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}

#[async_trait(?Send)]
impl EventHandler for MeshRenderer {
    async fn handle(&self, event: &mut Event) -> anyhow::Result<()> {
        if let Some(touch) = event.as_touch()
            && self.steer(touch)
        {
            event.mark_handled();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::graphics::ShaderStage;

    fn renderer() -> (Resources, MeshRenderer) {
        let resources = Resources::new();
        let renderer = MeshRenderer::new(&resources).unwrap();
        (resources, renderer)
    }

    #[test]
    fn stock_shader_is_registered_with_render_entry_points() {
        let (resources, renderer) = renderer();
        let entry = resources
            .shaders()
            .read(renderer.shader(), |s| s.entry_point(ShaderStage::Fragment).map(str::to_string));
        assert_eq!(entry, Some(Some("fs_main".to_string())));
    }

    #[test]
    fn cleared_shader_yields_no_program() {
        let (resources, renderer) = renderer();
        resources.clear();
        let program = resources
            .shaders()
            .read(renderer.shader(), ShaderProgram::from_shader)
            .flatten();
        assert!(program.is_none());
    }

    #[test]
    fn drag_orbits_and_is_consumed() {
        let (_resources, renderer) = renderer();
        let before = renderer.camera().position();

        let mut event = Event::touch(TouchEvent::drag(Vec2::new(0.0, 0.0), Vec2::new(40.0, 0.0)));
        pollster::block_on(renderer.handle(&mut event)).unwrap();

        assert!(event.is_handled());
        let after = renderer.camera().position();
        assert!((after - before).length() > 1e-3);
        assert!((after.length() - before.length()).abs() < 1e-4);
    }

    #[test]
    fn scale_changes_distance() {
        let (_resources, renderer) = renderer();
        let r0 = renderer.camera().radius();
        assert!(renderer.steer(&TouchEvent::scale(-1.0, Vec2::zero())));
        assert!((renderer.camera().radius() - (r0 - 1.0)).abs() < 1e-5);
    }

    #[test]
    fn translate_moves_target() {
        let (_resources, renderer) = renderer();
        renderer.set_camera(Camera::default());
        assert!(renderer.steer(&TouchEvent::translate(&[Vec2::zero()], Vec2::new(10.0, 0.0))));
        assert_ne!(renderer.camera().target(), glam::Vec3::ZERO);
    }

    #[test]
    fn resize_updates_aspect_without_consuming() {
        let (_resources, renderer) = renderer();
        let mut event = Event::touch(TouchEvent::resize(800.0, 400.0));
        pollster::block_on(renderer.handle(&mut event)).unwrap();

        assert!(!event.is_handled());
        assert_eq!(renderer.camera().aspect_ratio(), 2.0);
    }

    #[test]
    fn lifecycle_events_pass_through() {
        let (_resources, renderer) = renderer();
        let mut event = Event::lifecycle(crate::event::Lifecycle::Started);
        pollster::block_on(renderer.handle(&mut event)).unwrap();
        assert!(!event.is_handled());
    }

    #[test]
    fn each_warning_is_raised_once() {
        let (_resources, renderer) = renderer();
        let raised: Vec<bool> = (0..3)
            .map(|_| renderer.warn_once(Warning::StaleShader, String::new))
            .collect();
        assert_eq!(raised, [true, false, false]);
    }

    #[test]
    fn warnings_that_stop_recurring_are_forgotten() {
        let (resources, renderer) = renderer();
        let mut scene = crate::scene::Scene::new();
        let gone = scene.create(None);
        let kept = scene.create(None);
        let material = resources.create_default_material();

        renderer.warn_once(Warning::StaleShader, String::new);
        renderer.warn_once(Warning::MissingMesh(gone), String::new);
        renderer.warn_once(Warning::MissingMesh(kept), String::new);
        renderer.warn_once(Warning::StaleMaterial(material), String::new);

        let active = HashSet::from([Warning::MissingMesh(kept)]);
        renderer.prune_warnings(&active);

        let warned = renderer.warned.borrow();
        assert_eq!(warned.len(), 2);
        assert!(warned.contains(&Warning::StaleShader));
        assert!(warned.contains(&Warning::MissingMesh(kept)));
    }

    #[test]
    fn rejected_shader_stays_rejected_across_prunes() {
        let (_resources, renderer) = renderer();
        let shader = renderer.shader();
        assert!(!renderer.is_rejected(shader));

        renderer.reject_shader(shader, "entry point `vs_main` is not a function");
        renderer.prune_warnings(&HashSet::new());

        assert!(renderer.is_rejected(shader));
    }
}
