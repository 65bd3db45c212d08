//! Built-in components understood by the stock renderer.

mod material;
mod mesh;
mod transform;

pub use material::MaterialComponent;
pub use mesh::MeshComponent;
pub use transform::{Position, Transform, model_matrix};
