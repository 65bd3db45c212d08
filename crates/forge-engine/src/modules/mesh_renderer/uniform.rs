use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::graphics::{Material, MaterialParam};

/// Distance between per-draw blocks in the uniform buffer. Matches the
/// default `min_uniform_buffer_offset_alignment`.
pub(super) const UNIFORM_STRIDE: u64 = 256;

pub(super) const BASE_COLOR: &str = "baseColor";
pub(super) const ROUGHNESS: &str = "roughness";
pub(super) const METALLIC: &str = "metallic";
pub(super) const NORMAL_SCALE: &str = "normalScale";

/// Mirrors `Draw` in `shaders/mesh.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(super) struct DrawUniform {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub base_color: [f32; 4],
    pub surface: [f32; 4],
}

pub(super) const DRAW_UNIFORM_SIZE: u64 = std::mem::size_of::<DrawUniform>() as u64;

/// The material terms the mesh shader understands.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(super) struct SurfaceTerms {
    pub base_color: [f32; 4],
    pub surface: [f32; 4],
}

impl SurfaceTerms {
    /// Reads the known parameters; missing or mistyped ones fall back to
    /// a white dielectric.
    pub fn from_material(material: &Material) -> Self {
        let base_color = match material.get(BASE_COLOR) {
            Some(MaterialParam::Vec4(c)) => c,
            Some(MaterialParam::Vec3([r, g, b])) => [r, g, b, 1.0],
            _ => [1.0; 4],
        };
        let float = |name: &str, default: f32| match material.get(name) {
            Some(MaterialParam::Float(v)) => v,
            _ => default,
        };
        let [nx, ny] = match material.get(NORMAL_SCALE) {
            Some(MaterialParam::Vec2(s)) => s,
            _ => [1.0, 1.0],
        };
        Self {
            base_color,
            surface: [float(ROUGHNESS, 0.5), float(METALLIC, 0.0), nx, ny],
        }
    }

    pub fn uniform(self, view_proj: Mat4, model: Mat4) -> DrawUniform {
        DrawUniform {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            base_color: self.base_color,
            surface: self.surface,
        }
    }
}

/// Lays `draws` out at `UNIFORM_STRIDE` intervals, ready for one upload.
pub(super) fn pack_draws(draws: &[DrawUniform]) -> Vec<u8> {
    let stride = UNIFORM_STRIDE as usize;
    let mut bytes = vec![0u8; draws.len() * stride];
    for (chunk, draw) in bytes.chunks_exact_mut(stride).zip(draws) {
        chunk[..DRAW_UNIFORM_SIZE as usize].copy_from_slice(bytemuck::bytes_of(draw));
    }
    bytes
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec4};

    use super::*;

    #[test]
    fn block_fits_stride_and_alignment() {
        assert!(DRAW_UNIFORM_SIZE <= UNIFORM_STRIDE);
        assert_eq!(DRAW_UNIFORM_SIZE % 16, 0);
    }

    #[test]
    fn default_material_maps_to_shader_terms() {
        let terms = SurfaceTerms::from_material(&Material::default_pbr());
        assert_eq!(terms.base_color, [1.0; 4]);
        assert_eq!(terms.surface, [0.5, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn explicit_parameters_win() {
        let mut m = Material::new("Gold");
        m.set(BASE_COLOR, Vec4::new(1.0, 0.8, 0.2, 1.0));
        m.set(ROUGHNESS, 0.2f32);
        m.set(METALLIC, 1.0f32);
        m.set(NORMAL_SCALE, Vec2::new(0.5, 2.0));

        let terms = SurfaceTerms::from_material(&m);
        assert_eq!(terms.base_color, [1.0, 0.8, 0.2, 1.0]);
        assert_eq!(terms.surface, [0.2, 1.0, 0.5, 2.0]);
    }

    #[test]
    fn mistyped_parameter_is_ignored() {
        let mut m = Material::new("Odd");
        m.set(ROUGHNESS, true);
        assert_eq!(SurfaceTerms::from_material(&m).surface[0], 0.5);
    }

    #[test]
    fn draws_land_on_stride_boundaries() {
        let terms = SurfaceTerms::from_material(&Material::default_pbr());
        let a = terms.uniform(Mat4::IDENTITY, Mat4::IDENTITY);
        let b = terms.uniform(Mat4::IDENTITY, Mat4::from_translation(glam::Vec3::X));

        let bytes = pack_draws(&[a, b]);
        assert_eq!(bytes.len(), 2 * UNIFORM_STRIDE as usize);

        let second = &bytes[UNIFORM_STRIDE as usize..][..DRAW_UNIFORM_SIZE as usize];
        assert_eq!(bytemuck::pod_read_unaligned::<DrawUniform>(second), b);
    }
}
