use crate::ecs::Component;
use crate::graphics::Material;
use crate::handle::Handle;

/// Links an entity to a material in the shared resource table.
///
/// Holds a handle only; if the material is destroyed the handle goes stale
/// and the renderer skips the entity.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MaterialComponent {
    pub material: Handle<Material>,
}

impl MaterialComponent {
    pub const fn new(material: Handle<Material>) -> Self {
        Self { material }
    }
}

impl Component for MaterialComponent {}
