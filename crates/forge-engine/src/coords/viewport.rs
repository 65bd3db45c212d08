/// Surface size in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// False for empty (minimized) or non-finite sizes.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width over height; 1 when the viewport is not valid.
    #[inline]
    pub fn aspect_ratio(self) -> f32 {
        if self.is_valid() { self.width / self.height } else { 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_of_empty_viewport_is_one() {
        assert_eq!(Viewport::new(0.0, 720.0).aspect_ratio(), 1.0);
        assert_eq!(Viewport::new(1280.0, 640.0).aspect_ratio(), 2.0);
    }
}
