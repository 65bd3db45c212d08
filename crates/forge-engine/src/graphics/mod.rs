//! CPU-side graphics resources.
//!
//! These types describe what the renderer uploads (materials, shaders, meshes)
//! and how it looks at the scene (camera). None of them touch the GPU; the
//! renderer module turns them into wgpu objects on demand.

mod camera;
mod material;
mod mesh;
mod shader;

pub use camera::Camera;
pub use material::{Material, MaterialParam};
pub use mesh::{MemoryMeshLoader, MeshData, MeshLoadError, MeshLoader, MeshVertex};
pub use shader::{Shader, ShaderElement, ShaderError, ShaderLayout, ShaderStage};
