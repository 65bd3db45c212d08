/// Linear RGBA color with premultiplied alpha.
///
/// Invariant: `r`, `g` and `b` never exceed `a`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Self = Self::from_premul(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::from_premul(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::from_premul(1.0, 1.0, 1.0, 1.0);

    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// From straight-alpha components; values are clamped to `[0, 1]`.
    #[inline]
    pub fn from_srgb(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: r.clamp(0.0, 1.0) * a,
            g: g.clamp(0.0, 1.0) * a,
            b: b.clamp(0.0, 1.0) * a,
            a,
        }
    }

    /// From straight-alpha bytes, e.g. a `#rrggbbaa` literal.
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        let f = |c: u8| c as f32 / 255.0;
        Self::from_srgb(f(r), f(g), f(b), f(a))
    }

    /// Straight-alpha `[r, g, b, a]`; fully transparent colors come back black.
    #[inline]
    pub fn to_straight(self) -> [f32; 4] {
        if self.a <= 0.0 {
            return [0.0; 4];
        }
        let inv = 1.0 / self.a;
        [self.r * inv, self.g * inv, self.b * inv, self.a]
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

impl From<Color> for glam::Vec4 {
    fn from(c: Color) -> Self {
        glam::Vec4::from(c.to_straight())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_is_premultiplied_and_clamped() {
        let c = Color::from_srgb(1.0, 2.0, -1.0, 0.5);
        assert_eq!(c, Color::from_premul(0.5, 0.5, 0.0, 0.5));
    }

    #[test]
    fn straight_roundtrip_for_opaque_bytes() {
        let c = Color::from_srgb_u8(255, 0, 51, 255);
        let [r, g, b, a] = c.to_straight();
        assert_eq!((r, g, a), (1.0, 0.0, 1.0));
        assert!((b - 0.2).abs() < 1e-6);
    }

    #[test]
    fn transparent_has_no_straight_color() {
        assert_eq!(Color::TRANSPARENT.to_straight(), [0.0; 4]);
    }
}
