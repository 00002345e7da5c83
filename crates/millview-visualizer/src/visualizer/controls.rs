//! Orbit camera controls
//!
//! The camera orbits `target` on a sphere. Pointer input accumulates pending
//! rotation, pan and dolly; [`OrbitControls::update`] applies them once per
//! frame. With damping enabled only a fraction of the pending rotation and
//! pan is applied per update and the remainder decays geometrically.

use super::camera::PerspectiveCamera;
use glam::Vec3;
use millview_settings::ControlSettings;
use std::f32::consts::{PI, TAU};

const EPS: f32 = 1e-6;

/// Pointer input forwarded from the viewport container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved by `(dx, dy)` pixels with a button held.
    /// `pan` selects panning (shift held) instead of rotation.
    Drag { dx: f32, dy: f32, pan: bool },
    /// Scroll wheel; negative values zoom in
    Scroll { delta: f32 },
}

/// Spherical coordinates around the target: theta about +Y from +Z, phi from +Y.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Spherical {
    radius: f32,
    theta: f32,
    phi: f32,
}

impl Spherical {
    fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enabled: bool,
    settings: ControlSettings,
    /// Pending (theta, phi) rotation
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pan_offset: Vec3,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(ControlSettings::default())
    }
}

impl OrbitControls {
    pub fn new(settings: ControlSettings) -> Self {
        Self {
            target: Vec3::ZERO,
            enabled: true,
            settings,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }

    pub fn settings(&self) -> &ControlSettings {
        &self.settings
    }

    /// Pending rotation not yet applied to the camera.
    pub fn pending_rotation(&self) -> (f32, f32) {
        (self.delta_theta, self.delta_phi)
    }

    pub fn pending_pan(&self) -> Vec3 {
        self.pan_offset
    }

    /// Rotate around the vertical axis by `angle` radians.
    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    /// Tilt toward the pole by `angle` radians.
    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Scale the orbit radius by `factor` on the next update (< 1 moves closer).
    pub fn dolly(&mut self, factor: f32) {
        if factor > 0.0 && factor.is_finite() {
            self.scale *= factor;
        }
    }

    fn zoom_scale(&self) -> f32 {
        0.95f32.powf(self.settings.zoom_speed)
    }

    /// Pan by a pixel delta. Without screen-space panning the motion stays
    /// parallel to the ground plane.
    pub fn pan(&mut self, dx: f32, dy: f32, camera: &PerspectiveCamera, viewport_height: u32) {
        if viewport_height == 0 {
            return;
        }
        let offset = camera.position - self.target;
        let target_distance = offset.length() * (camera.fov.to_radians() / 2.0).tan();
        let height = viewport_height as f32;
        let left = 2.0 * dx * target_distance / height * self.settings.pan_speed;
        let up = 2.0 * dy * target_distance / height * self.settings.pan_speed;

        let (right, cam_up, _) = camera.basis();
        self.pan_offset -= right * left;

        let up_dir = if self.settings.screen_space_panning {
            cam_up
        } else {
            camera.up.cross(right).normalize_or_zero()
        };
        self.pan_offset += up_dir * up;
    }

    /// Apply one input event.
    pub fn handle_input(
        &mut self,
        event: InputEvent,
        camera: &PerspectiveCamera,
        viewport_height: u32,
    ) {
        if !self.enabled {
            return;
        }
        match event {
            InputEvent::Drag { dx, dy, pan: true } => {
                self.pan(dx, dy, camera, viewport_height);
            }
            InputEvent::Drag { dx, dy, pan: false } => {
                if viewport_height == 0 {
                    return;
                }
                let height = viewport_height as f32;
                self.rotate_left(TAU * dx / height * self.settings.rotate_speed);
                self.rotate_up(TAU * dy / height * self.settings.rotate_speed);
            }
            InputEvent::Scroll { delta } => {
                if delta < 0.0 {
                    self.dolly(self.zoom_scale());
                } else if delta > 0.0 {
                    self.dolly(1.0 / self.zoom_scale());
                }
            }
        }
    }

    /// Advance one frame: apply pending motion to the camera, clamp, decay.
    ///
    /// Returns `true` if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let previous = camera.position;
        let offset = camera.position - self.target;
        let mut spherical = Spherical::from_offset(offset);

        let damping = self.settings.enable_damping;
        let factor = if damping {
            self.settings.damping_factor
        } else {
            1.0
        };

        spherical.theta += self.delta_theta * factor;
        spherical.phi += self.delta_phi * factor;

        spherical.phi = spherical
            .phi
            .clamp(0.0, self.settings.max_polar_angle)
            .clamp(EPS, PI - EPS);

        spherical.radius = (spherical.radius * self.scale)
            .clamp(self.settings.min_distance, self.settings.max_distance);

        self.target += self.pan_offset * factor;

        camera.position = self.target + spherical.to_offset();
        camera.look_at(self.target);

        if damping {
            self.delta_theta *= 1.0 - factor;
            self.delta_phi *= 1.0 - factor;
            self.pan_offset *= 1.0 - factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        previous.distance_squared(camera.position) > EPS
    }

    /// Polar angle of the camera around the target, from +Y.
    pub fn polar_angle(&self, camera: &PerspectiveCamera) -> f32 {
        Spherical::from_offset(camera.position - self.target).phi
    }
}
