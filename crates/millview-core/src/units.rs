//! Unit handling
//!
//! Machine coordinates are millimeters. The visualizer works in its own
//! render units; [`RenderUnit`] is the number of render units per millimeter.

use crate::error::ToolError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of render-space units that represent one millimeter.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderUnit(f32);

impl RenderUnit {
    /// Scale used by the stock viewer: 1 mm = 10 render units.
    pub const DEFAULT: RenderUnit = RenderUnit(10.0);

    pub const fn new(units_per_mm: f32) -> Self {
        Self(units_per_mm)
    }

    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }

    /// Convert a length in millimeters to render units.
    #[inline]
    pub fn mm_to_render(self, mm: f32) -> f32 {
        mm * self.0
    }

    /// Convert a render-space length back to millimeters.
    #[inline]
    pub fn render_to_mm(self, render: f32) -> f32 {
        render / self.0
    }
}

impl Default for RenderUnit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for RenderUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} units/mm", self.0)
    }
}

/// Diameter of the cutting tool in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolDiameter(f32);

impl ToolDiameter {
    /// Validating constructor: the diameter must be finite and strictly positive.
    pub fn new(mm: f32) -> Result<Self, ToolError> {
        if mm.is_finite() && mm > 0.0 {
            Ok(Self(mm))
        } else {
            Err(ToolError::InvalidDiameter { value: mm })
        }
    }

    /// Wrap a diameter without validation.
    ///
    /// The visualizer never rejects a diameter; a zero or negative value simply
    /// yields invisible or inverted geometry.
    pub const fn unchecked(mm: f32) -> Self {
        Self(mm)
    }

    #[inline]
    pub fn mm(self) -> f32 {
        self.0
    }

    /// Diameter expressed in render units.
    #[inline]
    pub fn in_render_units(self, unit: RenderUnit) -> f32 {
        unit.mm_to_render(self.0)
    }
}

impl fmt::Display for ToolDiameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} mm", self.0)
    }
}
