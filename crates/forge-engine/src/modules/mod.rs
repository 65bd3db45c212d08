//! Stock modules installed by applications.

mod input_logger;
mod mesh_renderer;

pub use input_logger::InputLogger;
pub use mesh_renderer::{MESH_SHADER_WGSL, MeshRenderer};
