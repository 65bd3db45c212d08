mod palette;
mod spin;

use std::rc::Rc;

use forge_engine::components::{MaterialComponent, MeshComponent, Position, Transform};
use forge_engine::device::GpuInit;
use forge_engine::graphics::MemoryMeshLoader;
use forge_engine::logging::{LoggingConfig, init_logging};
use forge_engine::modules::{InputLogger, MeshRenderer};
use forge_engine::window::{Runtime, RuntimeConfig};
use forge_engine::{Engine, EngineConfig};
use glam::Vec4;

use palette::Palette;
use spin::{Spin, Spinner};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "Forge Studio".to_string(),
        ..RuntimeConfig::default()
    };
    Runtime::run(config, GpuInit::default(), EngineConfig::default(), setup)?;
    Ok(())
}

fn setup(engine: &mut Engine) -> anyhow::Result<()> {
    let resources = engine.resources().clone();

    let brass = resources.create_default_material();
    resources.materials().update(brass, |m| {
        m.set_name("Brass");
        m.set("baseColor", Vec4::new(0.95, 0.72, 0.30, 1.0));
        m.set("metallic", 1.0f32);
        m.set("roughness", 0.35f32);
    });
    let plain = resources.create_default_material();

    // Logger first: it must see events before the renderer consumes them.
    let logger = Rc::new(InputLogger::new());
    engine.add_participant(&logger);

    engine.add_module(Rc::new(Spinner));

    let renderer = Rc::new(MeshRenderer::new(&resources)?);
    engine.add_participant(&renderer);

    let palette = Rc::new(Palette::new(resources.clone(), brass));
    engine.add_participant(&palette);

    let loader = MemoryMeshLoader::new();
    let scene = engine.scene_mut();

    let cube = scene.create(Some("Cube"));
    scene.add(cube, Position::new(-0.9, 0.0, 0.0));
    scene.add(cube, Transform::default());
    scene.add(cube, MeshComponent::load("cube", &loader));
    scene.add(cube, MaterialComponent::new(brass));
    scene.add(cube, Spin { radians_per_second: 0.6 });

    let triangle = scene.create(Some("Triangle"));
    scene.add(triangle, Position::new(0.9, 0.0, 0.0));
    scene.add(triangle, MeshComponent::load("triangle", &loader));
    scene.add(triangle, MaterialComponent::new(plain));

    log::info!("scene ready: {:?}", scene.named_entities());
    Ok(())
}
