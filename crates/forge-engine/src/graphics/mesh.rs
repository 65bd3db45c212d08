use std::collections::HashMap;

use parking_lot::RwLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshLoadError {
    #[error("mesh `{0}` not found")]
    NotFound(String),

    #[error("failed to parse mesh `{path}`: {message}")]
    Parse { path: String, message: String },
}

/// Interleaved vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Raw vertex + index buffers for one mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Single triangle in the z = 0 plane, facing +z.
    pub fn triangle() -> Self {
        let n = [0.0, 0.0, 1.0];
        Self::new(
            vec![
                MeshVertex::new([0.0, 0.5, 0.0], n, [0.5, 0.0]),
                MeshVertex::new([-0.5, -0.5, 0.0], n, [0.0, 1.0]),
                MeshVertex::new([0.5, -0.5, 0.0], n, [1.0, 1.0]),
            ],
            vec![0, 1, 2],
        )
    }

    /// Axis-aligned cube centered at the origin, one quad (4 vertices) per face.
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        // (normal, u axis, v axis)
        let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (n, u, v) in faces {
            let base = vertices.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let p = [
                    (n[0] + u[0] * su + v[0] * sv) * h,
                    (n[1] + u[1] * su + v[1] * sv) * h,
                    (n[2] + u[2] * su + v[2] * sv) * h,
                ];
                let uv = [(su + 1.0) * 0.5, 1.0 - (sv + 1.0) * 0.5];
                vertices.push(MeshVertex::new(p, n, uv));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        Self::new(vertices, indices)
    }
}

/// Supplies mesh data by name. Implementations may read files, decode
/// bundles, or generate geometry.
pub trait MeshLoader: Send + Sync {
    fn load(&self, name: &str) -> Result<MeshData, MeshLoadError>;
}

/// In-memory loader keyed by name. Preloaded with `"triangle"` and `"cube"`.
#[derive(Debug)]
pub struct MemoryMeshLoader {
    meshes: RwLock<HashMap<String, MeshData>>,
}

impl MemoryMeshLoader {
    pub fn new() -> Self {
        let mut meshes = HashMap::new();
        meshes.insert("triangle".to_string(), MeshData::triangle());
        meshes.insert("cube".to_string(), MeshData::cube(1.0));
        Self {
            meshes: RwLock::new(meshes),
        }
    }

    pub fn insert(&self, name: impl Into<String>, mesh: MeshData) {
        self.meshes.write().insert(name.into(), mesh);
    }
}

impl Default for MemoryMeshLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshLoader for MemoryMeshLoader {
    fn load(&self, name: &str) -> Result<MeshData, MeshLoadError> {
        let mesh = self
            .meshes
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| MeshLoadError::NotFound(name.to_string()))?;
        if mesh.is_empty() {
            return Err(MeshLoadError::Parse {
                path: name.to_string(),
                message: "mesh has no geometry".to_string(),
            });
        }
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_six_quads() {
        let cube = MeshData::cube(2.0);
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.index_count(), 36);
        assert!(cube.indices.iter().all(|&i| (i as usize) < cube.vertices.len()));
        for v in &cube.vertices {
            assert!(v.position.iter().all(|c| c.abs() <= 1.0 + f32::EPSILON));
        }
    }

    #[test]
    fn cube_vertices_lie_on_their_face() {
        let cube = MeshData::cube(1.0);
        for v in &cube.vertices {
            let along: f32 = v.position.iter().zip(v.normal).map(|(p, n)| p * n).sum();
            assert!((along - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn memory_loader_finds_builtins() {
        let loader = MemoryMeshLoader::new();
        assert_eq!(loader.load("triangle").unwrap(), MeshData::triangle());
        assert!(loader.load("cube").is_ok());
    }

    #[test]
    fn memory_loader_reports_missing_and_empty() {
        let loader = MemoryMeshLoader::new();
        assert!(matches!(loader.load("teapot"), Err(MeshLoadError::NotFound(n)) if n == "teapot"));

        loader.insert("hollow", MeshData::default());
        assert!(matches!(loader.load("hollow"), Err(MeshLoadError::Parse { .. })));
    }
}
