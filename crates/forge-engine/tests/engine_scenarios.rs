use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use forge_engine::components::{MaterialComponent, MeshComponent, Position};
use forge_engine::coords::Vec2;
use forge_engine::event::{Event, EventHandler, TouchEvent};
use forge_engine::graphics::{Material, MeshData, Shader, ShaderLayout};
use forge_engine::input::{
    InputEvent, Modifiers, MouseButton, MouseButtonState, PointerButtonEvent, PointerMoveEvent,
};
use forge_engine::modules::{InputLogger, MeshRenderer};
use forge_engine::{Engine, ResourceTable, Resources, Scene};

const WGSL: &str = "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0); }\n\
                    @fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";

#[test]
fn named_entity_leaves_view_when_destroyed() {
    let mut scene = Scene::new();
    let model = scene.create(Some("Model"));
    scene.add(model, Position::new(1.0, 1.0, 0.0));

    let found: Vec<_> = scene.view::<(Position,)>().collect();
    assert_eq!(found, vec![model]);

    assert!(scene.destroy_named("Model"));
    assert_eq!(scene.view::<(Position,)>().count(), 0);
    assert_eq!(scene.get("Model"), None);
}

#[test]
fn destroyed_shader_handle_stays_stale_after_slot_reuse() {
    let shaders: ResourceTable<Shader> = ResourceTable::new("shaders");
    let layout = ShaderLayout::render("vs_main", "fs_main");

    let h1 = shaders.create(Shader::from_wgsl("first", WGSL, &layout).unwrap());
    assert!(shaders.destroy(h1).is_some());
    assert!(shaders.get(h1).is_none());

    let h2 = shaders.create(Shader::from_wgsl("second", WGSL, &layout).unwrap());
    assert_eq!(h2.index(), h1.index());
    assert!(shaders.get(h1).is_none());
    assert_eq!(shaders.read(h2, |s| s.label().to_string()).as_deref(), Some("second"));
}

#[test]
fn generations_only_grow_across_reuse() {
    let materials: ResourceTable<Material> = ResourceTable::new("materials");
    let mut previous = Vec::new();
    for round in 0..8 {
        let h = materials.create(Material::new(format!("round {round}")));
        assert!(previous.iter().all(|old: &forge_engine::handle::Handle<Material>| {
            old.generation() < h.generation() && !materials.contains(*old)
        }));
        materials.destroy(h);
        previous.push(h);
    }
}

#[test]
fn view_membership_tracks_component_changes() {
    let mut scene = Scene::new();
    let a = scene.create(None);
    let b = scene.create(None);
    let mesh = MeshComponent::new("tri", MeshData::triangle());

    scene.add(a, Position::new(0.0, 0.0, 0.0));
    scene.add(a, mesh.clone());
    scene.add(b, Position::new(1.0, 0.0, 0.0));

    let both: Vec<_> = scene.view::<(Position, MeshComponent)>().collect();
    assert_eq!(both, vec![a]);

    scene.add(b, mesh);
    scene.remove::<Position>(a);
    let both: Vec<_> = scene.view::<(Position, MeshComponent)>().collect();
    assert_eq!(both, vec![b]);
}

#[test]
fn destroying_entity_purges_every_component() {
    let resources = Resources::new();
    let mut scene = Scene::new();
    let e = scene.create(Some("Thing"));
    scene.add(e, Position::new(0.0, 0.0, 0.0));
    scene.add(e, MaterialComponent::new(resources.create_default_material()));

    assert!(scene.destroy(e));
    assert!(scene.get_component::<Position>(e).is_none());
    assert!(scene.get_component::<MaterialComponent>(e).is_none());

    let reused = scene.create(None);
    assert!(scene.get_component::<Position>(reused).is_none());
}

struct Tagged {
    tag: &'static str,
    log: Rc<RefCell<Vec<&'static str>>>,
    consume: bool,
}

#[async_trait(?Send)]
impl EventHandler for Tagged {
    async fn handle(&self, event: &mut Event) -> anyhow::Result<()> {
        self.log.borrow_mut().push(self.tag);
        if self.consume {
            event.mark_handled();
        }
        Ok(())
    }
}

fn tagged(tag: &'static str, log: &Rc<RefCell<Vec<&'static str>>>, consume: bool) -> Rc<Tagged> {
    Rc::new(Tagged {
        tag,
        log: log.clone(),
        consume,
    })
}

#[test]
fn handled_event_never_reaches_later_subscribers() {
    let engine = Engine::default();
    let log = Rc::new(RefCell::new(Vec::new()));
    let a = tagged("A", &log, true);
    let b = tagged("B", &log, false);
    let c = tagged("C", &log, false);
    engine.subscribe(&a);
    engine.subscribe(&b);
    engine.subscribe(&c);

    let handled = pollster::block_on(engine.handle_touch(TouchEvent::tap(Vec2::new(5.0, 5.0))));

    assert!(handled);
    assert_eq!(*log.borrow(), vec!["A"]);
}

#[test]
fn repeated_dispatch_keeps_subscription_order() {
    let engine = Engine::default();
    let log = Rc::new(RefCell::new(Vec::new()));
    let handlers = [tagged("A", &log, false), tagged("B", &log, false), tagged("C", &log, false)];
    for h in &handlers {
        engine.subscribe(h);
    }

    pollster::block_on(async {
        for _ in 0..3 {
            engine.handle_touch(TouchEvent::tap(Vec2::zero())).await;
        }
    });

    assert_eq!(*log.borrow(), ["A", "B", "C"].repeat(3));
}

#[test]
fn material_layout_is_stable_and_sized() {
    let mut m = Material::new("Layout");
    m.set("roughness", 0.5f32);
    m.set("metallic", 0.0f32);
    m.set("normalScale", glam::Vec2::new(1.0, 1.0));

    let first = m.write_uniform_bytes();
    assert_eq!(first, m.write_uniform_bytes());
    assert_eq!(first.len(), 4 + 4 + 8);
    assert_eq!(m.size_bytes(), first.len());

    m.remove("roughness");
    m.set("roughness", 0.5f32);
    let names: Vec<_> = m.parameters().map(|(name, _)| name.to_string()).collect();
    assert_eq!(names, ["metallic", "normalScale", "roughness"]);
    assert_eq!(m.write_uniform_bytes().len(), m.size_bytes());
}

fn left(state: MouseButtonState, x: f32, y: f32) -> InputEvent {
    InputEvent::PointerButton(PointerButtonEvent {
        button: MouseButton::Left,
        state,
        x,
        y,
        modifiers: Modifiers::default(),
    })
}

#[test]
fn raw_drag_reaches_logger_then_steers_camera() {
    let mut engine = Engine::default();
    let logger = Rc::new(InputLogger::new());
    let renderer = Rc::new(MeshRenderer::new(engine.resources()).unwrap());
    engine.add_participant(&logger);
    engine.add_participant(&renderer);

    let eye = renderer.camera().position();
    pollster::block_on(async {
        engine.handle_input(&left(MouseButtonState::Pressed, 100.0, 100.0)).await;
        engine
            .handle_input(&InputEvent::PointerMoved(PointerMoveEvent { x: 100.0, y: 100.0 }))
            .await;
        engine
            .handle_input(&InputEvent::PointerMoved(PointerMoveEvent { x: 160.0, y: 100.0 }))
            .await;
        engine.handle_input(&left(MouseButtonState::Released, 160.0, 100.0)).await;
    });

    assert!(logger.event_count() >= 1);
    assert_ne!(renderer.camera().position(), eye);
    assert_eq!(engine.modules().len(), 2);
}

#[test]
fn shared_resources_see_background_loads() {
    let engine = Engine::default();
    let loader = engine.resources().clone();
    let layout = ShaderLayout::render("vs_main", "fs_main");

    let handle = std::thread::scope(|s| {
        s.spawn(|| loader.load_shader("bg", WGSL, &layout))
            .join()
            .unwrap()
    })
    .unwrap();

    assert!(engine.resources().shaders().contains(handle));
}
