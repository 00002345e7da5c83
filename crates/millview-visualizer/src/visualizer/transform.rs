//! Machine-to-render coordinate mapping
//!
//! The render space is Y-up. Machine Z (milling depth) becomes visual height
//! and machine Y is negated onto render Z, so the XY plane of the machine
//! lies on the render ground plane with increasing Y pointing away from the
//! default camera.

use glam::Vec3;
use millview_core::{Move, RenderUnit};

/// Maps machine millimeters to render-space units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoordinateTransform {
    scale: RenderUnit,
}

impl CoordinateTransform {
    pub fn new(scale: RenderUnit) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> RenderUnit {
        self.scale
    }

    /// `(x, y, z)` in millimeters to `(x·s, z·s, −y·s)`.
    ///
    /// Non-finite input propagates unchanged.
    #[inline]
    pub fn to_render_xyz(&self, x: f32, y: f32, z: f32) -> Vec3 {
        let s = self.scale.get();
        Vec3::new(x * s, z * s, -y * s)
    }

    #[inline]
    pub fn to_render(&self, mv: &Move) -> Vec3 {
        self.to_render_xyz(mv.x, mv.y, mv.z)
    }

    /// Inverse of [`to_render_xyz`](Self::to_render_xyz).
    pub fn to_machine(&self, p: Vec3) -> (f32, f32, f32) {
        let s = self.scale.get();
        (p.x / s, -p.z / s, p.y / s)
    }

    /// Scale a length (diameter, cell size) from millimeters to render units.
    #[inline]
    pub fn length_to_render(&self, mm: f32) -> f32 {
        self.scale.mm_to_render(mm)
    }
}
