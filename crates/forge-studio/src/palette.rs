use std::cell::Cell;

use async_trait::async_trait;
use forge_engine::Resources;
use forge_engine::event::{Event, EventHandler, TouchKind};
use forge_engine::graphics::Material;
use forge_engine::handle::Handle;
use forge_engine::module::Module;
use glam::Vec4;

const SWATCHES: [[f32; 4]; 4] = [
    [0.95, 0.72, 0.30, 1.0],
    [0.30, 0.62, 0.95, 1.0],
    [0.45, 0.85, 0.45, 1.0],
    [0.90, 0.35, 0.40, 1.0],
];

/// Cycles a material's base color on every tap.
///
/// Registered as a participant so the module stack keeps it alive; it has no
/// per-frame work.
pub struct Palette {
    resources: Resources,
    material: Handle<Material>,
    next: Cell<usize>,
}

impl Palette {
    pub fn new(resources: Resources, material: Handle<Material>) -> Self {
        Self {
            resources,
            material,
            next: Cell::new(1),
        }
    }
}

impl Module for Palette {
    fn name(&self) -> &str {
        "palette"
    }
}

#[async_trait(?Send)]
impl EventHandler for Palette {
    async fn handle(&self, event: &mut Event) -> anyhow::Result<()> {
        if event.as_touch().map(|t| t.kind) != Some(TouchKind::Tap) {
            return Ok(());
        }

        let i = self.next.get();
        self.next.set((i + 1) % SWATCHES.len());
        let color = Vec4::from(SWATCHES[i]);

        let name = self
            .resources
            .materials()
            .update(self.material, |m| {
                m.set("baseColor", color);
                m.name().to_string()
            })
            .ok_or_else(|| anyhow::anyhow!("palette material {:?} is gone", self.material))?;

        log::info!("{name} recolored to {color}");
        event.mark_handled();
        Ok(())
    }
}
