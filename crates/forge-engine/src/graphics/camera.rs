use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

use glam::{Mat4, Vec3};

const PHI_LIMIT: f32 = FRAC_PI_2 - 0.1;
const MIN_RADIUS: f32 = 0.1;

/// Orbit camera around a target point.
///
/// The eye position is derived from spherical coordinates (`radius`,
/// `theta` azimuth, `phi` elevation) relative to `target`; every mutation
/// recomputes it. Projection is right-handed with a `0..1` depth range.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    target: Vec3,
    up: Vec3,

    radius: f32,
    theta: f32,
    phi: f32,

    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3, up: Vec3) -> Self {
        let offset = position - target;
        let radius = offset.length().max(MIN_RADIUS);
        let mut cam = Self {
            position,
            target,
            up,
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).asin(),
            fov_y: FRAC_PI_3,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        };
        cam.update_position();
        cam
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect
    }

    /// Rotates around the target. Elevation is clamped short of the poles.
    pub fn orbit(&mut self, delta_theta: f32, delta_phi: f32) {
        self.theta += delta_theta;
        self.phi = (self.phi + delta_phi).clamp(-PHI_LIMIT, PHI_LIMIT);
        self.update_position();
    }

    /// Moves toward (negative) or away from (positive) the target.
    pub fn zoom(&mut self, delta: f32) {
        self.radius = (self.radius + delta).max(MIN_RADIUS);
        self.update_position();
    }

    /// Slides eye and target together within the camera plane.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let forward = (self.target - self.position).normalize_or_zero();
        let right = forward.cross(self.up).normalize_or_zero();
        let true_up = right.cross(forward).normalize_or_zero();
        self.target += right * dx + true_up * dy;
        self.update_position();
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        self.update_position();
    }

    /// Ignores non-finite or non-positive ratios (e.g. a minimized window).
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn set_field_of_view(&mut self, fov_y: f32) {
        self.fov_y = fov_y;
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up.normalize_or_zero())
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    fn update_position(&mut self) {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        self.position = self.target
            + Vec3::new(
                self.radius * cos_phi * sin_theta,
                self.radius * sin_phi,
                self.radius * cos_phi * cos_theta,
            );
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, -3.0), Vec3::ZERO, Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn default_looks_at_origin_from_minus_z() {
        let cam = Camera::default();
        assert!(approx(cam.position(), Vec3::new(0.0, 0.0, -3.0)));
        assert!((cam.radius() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn orbit_preserves_radius() {
        let mut cam = Camera::default();
        cam.orbit(0.7, 0.3);
        assert!(((cam.position() - cam.target()).length() - 3.0).abs() < 1e-4);
    }

    #[test]
    fn orbit_clamps_elevation() {
        let mut cam = Camera::default();
        cam.orbit(0.0, 10.0);
        let offset = cam.position() - cam.target();
        let phi = (offset.y / offset.length()).asin();
        assert!((phi - PHI_LIMIT).abs() < 1e-4);

        cam.orbit(0.0, -20.0);
        let offset = cam.position() - cam.target();
        let phi = (offset.y / offset.length()).asin();
        assert!((phi + PHI_LIMIT).abs() < 1e-4);
    }

    #[test]
    fn zoom_never_goes_below_minimum_radius() {
        let mut cam = Camera::default();
        cam.zoom(-100.0);
        assert_eq!(cam.radius(), MIN_RADIUS);
        cam.zoom(1.0);
        assert!((cam.radius() - 1.1).abs() < 1e-6);
    }

    #[test]
    fn pan_moves_target_and_eye_together() {
        let mut cam = Camera::default();
        let before = cam.position() - cam.target();
        cam.pan(1.0, 0.5);
        assert!(!approx(cam.target(), Vec3::ZERO));
        assert!(approx(cam.position() - cam.target(), before));
        // Looking down +z with +y up: right is -x.
        assert!(approx(cam.target(), Vec3::new(-1.0, 0.5, 0.0)));
    }

    #[test]
    fn aspect_ratio_rejects_degenerate_values() {
        let mut cam = Camera::default();
        cam.set_aspect_ratio(16.0 / 9.0);
        cam.set_aspect_ratio(0.0);
        cam.set_aspect_ratio(f32::NAN);
        assert!((cam.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn retarget_keeps_orbit_distance() {
        let mut cam = Camera::default();
        cam.set_target(Vec3::new(2.0, 1.0, 0.0));
        assert!(approx(cam.position(), Vec3::new(2.0, 1.0, -3.0)));
    }

    #[test]
    fn target_projects_to_screen_center() {
        let mut cam = Camera::default();
        cam.set_field_of_view(FRAC_PI_2);
        cam.set_clip_planes(0.5, 50.0);
        let clip = cam.view_projection() * cam.target().extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
