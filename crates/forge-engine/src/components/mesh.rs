use std::sync::Arc;

use crate::ecs::Component;
use crate::graphics::{MeshData, MeshLoader};

/// Geometry attached to an entity. `mesh` is `None` when loading failed;
/// the renderer skips such entities.
#[derive(Debug, Clone)]
pub struct MeshComponent {
    pub name: String,
    pub mesh: Option<Arc<MeshData>>,
}

impl MeshComponent {
    pub fn new(name: impl Into<String>, mesh: MeshData) -> Self {
        Self {
            name: name.into(),
            mesh: Some(Arc::new(mesh)),
        }
    }

    /// Loads `name` through `loader`. Failures are logged, not returned.
    pub fn load(name: &str, loader: &dyn MeshLoader) -> Self {
        let mesh = match loader.load(name) {
            Ok(data) => Some(Arc::new(data)),
            Err(err) => {
                log::error!("mesh `{name}` unavailable: {err}");
                None
            }
        };
        Self {
            name: name.to_string(),
            mesh,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.mesh.is_some()
    }
}

impl Component for MeshComponent {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::MemoryMeshLoader;

    #[test]
    fn load_success_and_failure() {
        let loader = MemoryMeshLoader::new();
        let ok = MeshComponent::load("cube", &loader);
        assert!(ok.is_loaded());
        assert_eq!(ok.name, "cube");

        let missing = MeshComponent::load("teapot", &loader);
        assert!(!missing.is_loaded());
        assert_eq!(missing.name, "teapot");
    }
}
