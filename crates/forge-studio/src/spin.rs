use forge_engine::components::Transform;
use forge_engine::ecs::{Component, Entity};
use forge_engine::module::{Module, UpdateCtx};

/// Turns an entity about its Y axis.
#[derive(Debug, Copy, Clone)]
pub struct Spin {
    pub radians_per_second: f32,
}

impl Component for Spin {}

/// Rewrites the `Transform` of every spinning entity from elapsed time.
pub struct Spinner;

impl Module for Spinner {
    fn name(&self) -> &str {
        "spinner"
    }

    fn update(&self, ctx: &mut UpdateCtx<'_>) {
        let t = ctx.time.elapsed;
        let angles: Vec<(Entity, f32)> = ctx
            .scene
            .view::<(Spin,)>()
            .with_components()
            .map(|(e, (spin,))| (e, spin.radians_per_second * t))
            .collect();

        for (entity, angle) in angles {
            if let Some(transform) = ctx.scene.get_component_mut::<Transform>(entity) {
                *transform = Transform::from_rotation_y(angle);
            }
        }
    }
}
