use std::sync::Arc;

use crate::graphics::{Material, Shader, ShaderError, ShaderLayout, ShaderStage};
use crate::handle::Handle;

use super::ResourceTable;

/// Shader and material tables shared between the engine, its modules, and
/// any background loading path.
///
/// Cloning is cheap and yields another view onto the same tables.
#[derive(Clone)]
pub struct Resources {
    shaders: Arc<ResourceTable<Shader>>,
    materials: Arc<ResourceTable<Material>>,
}

impl Resources {
    pub fn new() -> Self {
        Self {
            shaders: Arc::new(ResourceTable::new("shaders")),
            materials: Arc::new(ResourceTable::new("materials")),
        }
    }

    pub fn shaders(&self) -> &ResourceTable<Shader> {
        &self.shaders
    }

    pub fn materials(&self) -> &ResourceTable<Material> {
        &self.materials
    }

    /// Validates `source` against `layout` and stores the shader.
    pub fn load_shader(
        &self,
        label: &str,
        source: &str,
        layout: &ShaderLayout,
    ) -> Result<Handle<Shader>, ShaderError> {
        let shader = Shader::from_wgsl(label, source, layout)?;
        let handle = self.shaders.create(shader);
        log::debug!("loaded shader `{label}` as {handle:?}");
        Ok(handle)
    }

    /// Binds another entry point on an existing shader.
    pub fn add_shader_function(
        &self,
        handle: Handle<Shader>,
        stage: ShaderStage,
        name: &str,
    ) -> Result<(), ShaderError> {
        self.shaders
            .update(handle, |shader| shader.add_function(stage, name))
            .ok_or(ShaderError::InvalidHandle)?
    }

    /// Creates an empty material named `name`.
    pub fn create_material(&self, name: &str) -> Handle<Material> {
        self.materials.create(Material::new(name))
    }

    /// Creates a material with the stock PBR parameters.
    pub fn create_default_material(&self) -> Handle<Material> {
        self.materials.create(Material::default_pbr())
    }

    /// Drops every shader and material, invalidating all handles.
    pub fn clear(&self) {
        let shaders = self.shaders.clear();
        let materials = self.materials.clear();
        log::info!("resources cleared ({shaders} shaders, {materials} materials)");
    }
}

impl Default for Resources {
    fn default() -> Self {
        Self::new()
    }
}
