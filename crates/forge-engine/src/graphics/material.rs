use std::collections::HashMap;
use std::fmt;

/// Typed value of a single material parameter.
///
/// Each variant has a fixed packed size in the uniform byte layout:
///
/// | variant | bytes | encoding                                  |
/// |---------|-------|-------------------------------------------|
/// | `Float` | 4     | `f32`                                     |
/// | `Vec2`  | 8     | `[f32; 2]`                                |
/// | `Vec3`  | 16    | `[f32; 3]` + one zeroed `f32` of padding  |
/// | `Vec4`  | 16    | `[f32; 4]`                                |
/// | `Int`   | 8     | `i64`                                     |
/// | `Bool`  | 1     | `0` or `1`                                |
///
/// All multi-byte values use native endianness, as they are uploaded as-is.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MaterialParam {
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Int(i64),
    Bool(bool),
}

impl MaterialParam {
    /// Packed size in bytes.
    pub const fn size(&self) -> usize {
        match self {
            MaterialParam::Float(_) => 4,
            MaterialParam::Vec2(_) => 8,
            MaterialParam::Vec3(_) => 16,
            MaterialParam::Vec4(_) => 16,
            MaterialParam::Int(_) => 8,
            MaterialParam::Bool(_) => 1,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            MaterialParam::Float(_) => "Float",
            MaterialParam::Vec2(_) => "Float2",
            MaterialParam::Vec3(_) => "Float3",
            MaterialParam::Vec4(_) => "Float4",
            MaterialParam::Int(_) => "Int",
            MaterialParam::Bool(_) => "Bool",
        }
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            MaterialParam::Float(v) => out.extend_from_slice(bytemuck::bytes_of(v)),
            MaterialParam::Vec2(v) => out.extend_from_slice(bytemuck::cast_slice(v)),
            MaterialParam::Vec3([x, y, z]) => {
                out.extend_from_slice(bytemuck::cast_slice(&[*x, *y, *z, 0.0f32]))
            }
            MaterialParam::Vec4(v) => out.extend_from_slice(bytemuck::cast_slice(v)),
            MaterialParam::Int(v) => out.extend_from_slice(bytemuck::bytes_of(v)),
            MaterialParam::Bool(v) => out.push(u8::from(*v)),
        }
    }
}

impl fmt::Display for MaterialParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = ", self.type_name())?;
        match self {
            MaterialParam::Float(v) => write!(f, "{v}"),
            MaterialParam::Vec2(v) => write!(f, "{v:?}"),
            MaterialParam::Vec3(v) => write!(f, "{v:?}"),
            MaterialParam::Vec4(v) => write!(f, "{v:?}"),
            MaterialParam::Int(v) => write!(f, "{v}"),
            MaterialParam::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<f32> for MaterialParam {
    fn from(v: f32) -> Self {
        MaterialParam::Float(v)
    }
}

impl From<glam::Vec2> for MaterialParam {
    fn from(v: glam::Vec2) -> Self {
        MaterialParam::Vec2(v.to_array())
    }
}

impl From<glam::Vec3> for MaterialParam {
    fn from(v: glam::Vec3) -> Self {
        MaterialParam::Vec3(v.to_array())
    }
}

impl From<glam::Vec4> for MaterialParam {
    fn from(v: glam::Vec4) -> Self {
        MaterialParam::Vec4(v.to_array())
    }
}

impl From<i64> for MaterialParam {
    fn from(v: i64) -> Self {
        MaterialParam::Int(v)
    }
}

impl From<bool> for MaterialParam {
    fn from(v: bool) -> Self {
        MaterialParam::Bool(v)
    }
}

/// Named set of parameters with a stable packed layout.
///
/// Layout order is the order in which parameter names were first set.
/// Overwriting a parameter keeps its position; removing it and setting it
/// again moves it to the end.
#[derive(Debug, Clone)]
pub struct Material {
    name: String,
    params: HashMap<String, MaterialParam>,
    order: Vec<String>,
    dirty: bool,
}

impl Material {
    pub const DEFAULT_NAME: &'static str = "UnnamedMaterial";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: HashMap::new(),
            order: Vec::new(),
            dirty: true,
        }
    }

    /// Stock material: roughness 0.5, metallic 0.0, normalScale (1, 1).
    pub fn default_pbr() -> Self {
        let mut m = Self::new("DefaultMaterial");
        m.set("roughness", 0.5f32);
        m.set("metallic", 0.0f32);
        m.set("normalScale", MaterialParam::Vec2([1.0, 1.0]));
        m
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Sets or overwrites a parameter.
    pub fn set(&mut self, name: &str, value: impl Into<MaterialParam>) {
        let value = value.into();
        match self.params.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.order.push(name.to_string());
                self.params.insert(name.to_string(), value);
            }
        }
        self.dirty = true;
    }

    pub fn get(&self, name: &str) -> Option<MaterialParam> {
        self.params.get(name).copied()
    }

    /// Removes a parameter and its layout slot.
    pub fn remove(&mut self, name: &str) -> Option<MaterialParam> {
        let removed = self.params.remove(name)?;
        self.order.retain(|n| n != name);
        self.dirty = true;
        Some(removed)
    }

    /// Parameters in layout order.
    pub fn parameters(&self) -> impl Iterator<Item = (&str, MaterialParam)> + '_ {
        self.order
            .iter()
            .filter_map(|n| self.params.get(n).map(|v| (n.as_str(), *v)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total packed size, i.e. the sum of every parameter's declared size.
    pub fn size_bytes(&self) -> usize {
        self.parameters().map(|(_, v)| v.size()).sum()
    }

    /// Packs every parameter in layout order.
    pub fn write_uniform_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size_bytes());
        for (_, value) in self.parameters() {
            value.write_to(&mut out);
        }
        out
    }

    /// True if parameters changed since the last `take_uniform_update`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns packed bytes only when something changed since the last call.
    pub fn take_uniform_update(&mut self) -> Option<Vec<u8>> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(self.write_uniform_bytes())
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Material [{}] ({} bytes)", self.name, self.size_bytes())?;
        for (name, value) in self.parameters() {
            writeln!(f, "- {name}: {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Material {
        let mut m = Material::new("sample");
        m.set("roughness", 0.25f32);
        m.set("metallic", 1.0f32);
        m.set("normalScale", MaterialParam::Vec2([1.0, 2.0]));
        m
    }

    #[test]
    fn serialization_is_repeatable() {
        let m = sample();
        assert_eq!(m.write_uniform_bytes(), m.write_uniform_bytes());
    }

    #[test]
    fn layout_follows_first_insertion_order() {
        let m = sample();
        let names: Vec<&str> = m.parameters().map(|(n, _)| n).collect();
        assert_eq!(names, ["roughness", "metallic", "normalScale"]);

        let bytes = m.write_uniform_bytes();
        assert_eq!(&bytes[0..4], &0.25f32.to_ne_bytes());
        assert_eq!(&bytes[4..8], &1.0f32.to_ne_bytes());
        assert_eq!(&bytes[8..12], &1.0f32.to_ne_bytes());
        assert_eq!(&bytes[12..16], &2.0f32.to_ne_bytes());
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut m = sample();
        m.set("roughness", 0.9f32);
        let names: Vec<&str> = m.parameters().map(|(n, _)| n).collect();
        assert_eq!(names, ["roughness", "metallic", "normalScale"]);
        assert_eq!(m.get("roughness"), Some(MaterialParam::Float(0.9)));
    }

    #[test]
    fn remove_and_readd_moves_to_end() {
        let mut m = sample();
        assert!(m.remove("roughness").is_some());
        m.set("roughness", 0.25f32);
        let names: Vec<&str> = m.parameters().map(|(n, _)| n).collect();
        assert_eq!(names, ["metallic", "normalScale", "roughness"]);

        let bytes = m.write_uniform_bytes();
        assert_eq!(&bytes[12..16], &0.25f32.to_ne_bytes());
    }

    #[test]
    fn buffer_size_is_sum_of_declared_sizes() {
        let mut m = Material::new("all");
        m.set("f", 1.0f32);
        m.set("v2", MaterialParam::Vec2([0.0; 2]));
        m.set("v3", MaterialParam::Vec3([1.0, 2.0, 3.0]));
        m.set("v4", MaterialParam::Vec4([0.0; 4]));
        m.set("i", -3i64);
        m.set("b", true);

        assert_eq!(m.size_bytes(), 4 + 8 + 16 + 16 + 8 + 1);
        assert_eq!(m.write_uniform_bytes().len(), m.size_bytes());
    }

    #[test]
    fn vec3_is_zero_padded() {
        let mut m = Material::new("v3");
        m.set("color", glam::Vec3::new(1.0, 2.0, 3.0));
        let bytes = m.write_uniform_bytes();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[12..16], &0.0f32.to_ne_bytes());
    }

    #[test]
    fn remove_missing_is_none_and_keeps_clean_state() {
        let mut m = sample();
        m.take_uniform_update();
        assert!(m.remove("missing").is_none());
        assert!(!m.is_dirty());
    }

    #[test]
    fn uniform_update_only_when_dirty() {
        let mut m = sample();
        assert!(m.take_uniform_update().is_some());
        assert!(m.take_uniform_update().is_none());
        m.set("metallic", 0.0f32);
        assert_eq!(m.take_uniform_update(), Some(m.write_uniform_bytes()));
    }

    #[test]
    fn default_pbr_parameters() {
        let m = Material::default_pbr();
        assert_eq!(m.name(), "DefaultMaterial");
        assert_eq!(m.get("roughness"), Some(MaterialParam::Float(0.5)));
        assert_eq!(m.get("metallic"), Some(MaterialParam::Float(0.0)));
        assert_eq!(m.get("normalScale"), Some(MaterialParam::Vec2([1.0, 1.0])));
        assert_eq!(m.size_bytes(), 16);
    }

    #[test]
    fn empty_material_packs_to_nothing() {
        let m = Material::default();
        assert_eq!(m.name(), Material::DEFAULT_NAME);
        assert!(m.write_uniform_bytes().is_empty());
    }

    #[test]
    fn display_lists_parameters_in_order() {
        let text = sample().to_string();
        let r = text.find("roughness").unwrap();
        let n = text.find("normalScale").unwrap();
        assert!(r < n);
        assert!(text.contains("Float2"));
    }
}
