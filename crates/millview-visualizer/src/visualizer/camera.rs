use glam::{Mat4, Vec3};
use millview_settings::CameraSettings;

/// Y-up perspective camera looking at `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov: f32, // degrees, vertical
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::from_settings(&CameraSettings::default(), 1.0)
    }
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 1.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov,
            aspect_ratio,
            near,
            far,
        }
    }

    pub fn from_settings(settings: &CameraSettings, aspect_ratio: f32) -> Self {
        Self {
            position: Vec3::from_array(settings.position),
            ..Self::new(settings.fov_degrees, aspect_ratio, settings.near, settings.far)
        }
    }

    /// Aspect ratio for a viewport size; `None` when the height is zero.
    pub fn aspect_for(width: u32, height: u32) -> Option<f32> {
        (height > 0).then(|| width as f32 / height as f32)
    }

    /// Recompute the aspect ratio. A zero height keeps the previous value.
    pub fn update_aspect_ratio(&mut self, width: u32, height: u32) -> bool {
        match Self::aspect_for(width, height) {
            Some(aspect) => {
                self.aspect_ratio = aspect;
                true
            }
            None => false,
        }
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    pub fn get_view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// OpenGL clip-space projection (depth in [-1, 1]).
    pub fn get_projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect_ratio, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.get_projection_matrix() * self.get_view_matrix()
    }

    /// World-space camera basis: (right, up, forward).
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.position).normalize_or_zero();
        let right = forward.cross(self.up).normalize_or_zero();
        let up = right.cross(forward);
        (right, up, forward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_settings() {
        let cam = PerspectiveCamera::default();
        assert_eq!(cam.position, Vec3::new(0.0, 200.0, 400.0));
        assert_eq!(cam.target, Vec3::ZERO);
        assert_eq!(cam.fov, 60.0);
        assert_eq!((cam.near, cam.far), (1.0, 10000.0));
    }

    #[test]
    fn test_aspect_updates() {
        let mut cam = PerspectiveCamera::default();
        assert!(cam.update_aspect_ratio(800, 600));
        assert!((cam.aspect_ratio - 4.0 / 3.0).abs() < 1e-6);
        assert!(!cam.update_aspect_ratio(800, 0));
        assert!((cam.aspect_ratio - 4.0 / 3.0).abs() < 1e-6);
        cam.update_aspect_ratio(1000, 500);
        assert_eq!(cam.aspect_ratio, 2.0);
    }

    #[test]
    fn test_view_matrix_centers_target() {
        let cam = PerspectiveCamera::default();
        let p = cam.view_projection().project_point3(Vec3::ZERO);
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
        assert!(p.z > -1.0 && p.z < 1.0);
    }
}
