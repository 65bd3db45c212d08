use glam::{Mat4, Vec3};

use crate::ecs::Component;

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl Component for Position {}

/// Model matrix. When both are present the renderer applies `Transform`
/// after translating by `Position`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub matrix: Mat4,
}

impl Transform {
    pub fn from_rotation_y(radians: f32) -> Self {
        Self {
            matrix: Mat4::from_rotation_y(radians),
        }
    }

    pub fn from_scale(scale: f32) -> Self {
        Self {
            matrix: Mat4::from_scale(Vec3::splat(scale)),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
        }
    }
}

impl Component for Transform {}

/// World matrix for an entity with an optional position and transform.
pub fn model_matrix(position: Option<&Position>, transform: Option<&Transform>) -> Mat4 {
    let translation = position.map_or(Mat4::IDENTITY, |p| Mat4::from_translation(p.to_vec3()));
    let local = transform.map_or(Mat4::IDENTITY, |t| t.matrix);
    translation * local
}
