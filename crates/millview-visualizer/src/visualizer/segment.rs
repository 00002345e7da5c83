//! Path segment geometry
//!
//! Each tool move is drawn as a thin cylinder between two render-space
//! points. The canonical cylinder is one unit tall, centred on the origin
//! along +Y with unit radius; a segment is that cylinder scaled, rotated
//! so +Y follows the move direction, then moved to the midpoint.

use glam::{Mat3, Mat4, Vec3};
use millview_core::Color;
use std::fmt;

/// Radial resolution of path cylinders
pub const SEGMENT_RADIAL_SEGMENTS: u32 = 5;

/// Segments shorter than this (render units) are treated as zero length
pub const MIN_SEGMENT_LENGTH: f32 = 1e-6;

/// Maps the look basis (forward along Z) onto the cylinder basis (axis along Y).
const CYLINDER_CORRECTION: Mat3 = Mat3::from_cols(Vec3::X, Vec3::NEG_Z, Vec3::Y);

/// Why a segment produced no geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateSegment {
    /// Consecutive points coincide
    ZeroLength,
    /// An endpoint has a NaN or infinite coordinate
    NonFinite,
}

impl fmt::Display for DegenerateSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroLength => write!(f, "zero-length segment"),
            Self::NonFinite => write!(f, "non-finite endpoint"),
        }
    }
}

/// One oriented cylinder standing for one tool move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentPrimitive {
    from: Vec3,
    to: Vec3,
    color: Color,
    radius: f32,
    orientation: Mat3,
}

impl SegmentPrimitive {
    pub fn from(&self) -> Vec3 {
        self.from
    }

    pub fn to(&self) -> Vec3 {
        self.to
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn length(&self) -> f32 {
        self.from.distance(self.to)
    }

    pub fn midpoint(&self) -> Vec3 {
        (self.from + self.to) * 0.5
    }

    /// Unit vector from `from` to `to`.
    pub fn direction(&self) -> Vec3 {
        (self.to - self.from).normalize()
    }

    /// Rotation taking the cylinder's +Y axis onto [`direction`](Self::direction).
    pub fn orientation(&self) -> Mat3 {
        self.orientation
    }

    /// `T(mid) · R · S(r, len, r)` applied to the canonical unit cylinder.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.midpoint())
            * Mat4::from_mat3(self.orientation)
            * Mat4::from_scale(Vec3::new(self.radius, self.length(), self.radius))
    }
}

/// Builds [`SegmentPrimitive`]s from pairs of render-space points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentGeometryBuilder {
    up: Vec3,
}

impl Default for SegmentGeometryBuilder {
    fn default() -> Self {
        Self { up: Vec3::Y }
    }
}

impl SegmentGeometryBuilder {
    pub fn new(up: Vec3) -> Self {
        Self { up }
    }

    /// Build the cylinder for a move, or `None` when the move is degenerate.
    ///
    /// `diameter` is already in render units. It is not validated; zero or
    /// negative values yield flat or inverted geometry.
    pub fn build(&self, from: Vec3, to: Vec3, color: Color, diameter: f32) -> Option<SegmentPrimitive> {
        self.try_build(from, to, color, diameter).ok()
    }

    /// Like [`build`](Self::build) but reports why nothing was produced.
    pub fn try_build(
        &self,
        from: Vec3,
        to: Vec3,
        color: Color,
        diameter: f32,
    ) -> Result<SegmentPrimitive, DegenerateSegment> {
        if !from.is_finite() || !to.is_finite() {
            return Err(DegenerateSegment::NonFinite);
        }
        if from.distance(to) < MIN_SEGMENT_LENGTH {
            return Err(DegenerateSegment::ZeroLength);
        }

        Ok(SegmentPrimitive {
            from,
            to,
            color,
            radius: diameter / 2.0,
            orientation: self.look_rotation(from, to) * CYLINDER_CORRECTION,
        })
    }

    /// Rotation whose Z column points from `target` back to `eye`, rolled by `up`.
    fn look_rotation(&self, eye: Vec3, target: Vec3) -> Mat3 {
        let mut z = (eye - target).normalize();
        let mut x = self.up.cross(z);

        if x.length_squared() < 1e-12 {
            // Direction parallel to up: nudge off the axis
            if self.up.z.abs() == 1.0 {
                z.x += 1e-4;
            } else {
                z.z += 1e-4;
            }
            z = z.normalize();
            x = self.up.cross(z);
        }

        let x = x.normalize();
        let y = z.cross(x);
        Mat3::from_cols(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert!(a.abs_diff_eq(b, 1e-3), "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_horizontal_segment() {
        let seg = SegmentGeometryBuilder::default()
            .build(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0), Color::BLUE, 20.0)
            .unwrap();
        assert_eq!(seg.length(), 100.0);
        assert_eq!(seg.radius(), 10.0);
        assert_eq!(seg.midpoint(), Vec3::new(50.0, 0.0, 0.0));
        assert_vec_eq(seg.orientation() * Vec3::Y, Vec3::X);
    }

    #[test]
    fn test_vertical_segment_is_oriented() {
        let seg = SegmentGeometryBuilder::default()
            .build(Vec3::new(100.0, 0.0, 0.0), Vec3::new(100.0, 50.0, 0.0), Color::RED, 20.0)
            .unwrap();
        assert_vec_eq(seg.orientation() * Vec3::Y, Vec3::Y);

        let down = SegmentGeometryBuilder::default()
            .build(Vec3::new(0.0, 50.0, 0.0), Vec3::ZERO, Color::RED, 1.0)
            .unwrap();
        assert_vec_eq(down.orientation() * Vec3::Y, Vec3::NEG_Y);
    }

    #[test]
    fn test_model_matrix_spans_endpoints() {
        let from = Vec3::new(-3.0, 7.0, 12.0);
        let to = Vec3::new(40.0, -5.0, 2.0);
        let seg = SegmentGeometryBuilder::default()
            .build(from, to, Color::BLUE, 4.0)
            .unwrap();
        let m = seg.model_matrix();
        assert_vec_eq(m.transform_point3(Vec3::new(0.0, -0.5, 0.0)), from);
        assert_vec_eq(m.transform_point3(Vec3::new(0.0, 0.5, 0.0)), to);
        assert!((seg.orientation().determinant() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_segments() {
        let builder = SegmentGeometryBuilder::default();
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(
            builder.try_build(p, p, Color::RED, 1.0),
            Err(DegenerateSegment::ZeroLength)
        );
        assert_eq!(
            builder.try_build(p, Vec3::new(f32::NAN, 0.0, 0.0), Color::RED, 1.0),
            Err(DegenerateSegment::NonFinite)
        );
        assert!(builder.build(p, p, Color::RED, 1.0).is_none());
    }

    #[test]
    fn test_diameter_not_validated() {
        let seg = SegmentGeometryBuilder::default()
            .build(Vec3::ZERO, Vec3::X, Color::RED, -2.0)
            .unwrap();
        assert_eq!(seg.radius(), -1.0);
    }
}
