//! Scene styling
//!
//! The look of the path scene: segment coloring, background and fog, grid
//! colors. Two presets exist, the default milling view and the legacy
//! single-color view.

use millview_core::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How path segments are colored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SegmentColoring {
    /// Color chosen by the destination move's rapid flag
    ByMoveKind { rapid: Color, milling: Color },
    /// Every segment the same color
    Uniform { color: Color },
}

impl SegmentColoring {
    /// Color of a segment ending at a move with the given rapid flag.
    pub fn color_for(&self, is_rapid: bool) -> Color {
        match *self {
            Self::ByMoveKind { rapid, milling } => {
                if is_rapid {
                    rapid
                } else {
                    milling
                }
            }
            Self::Uniform { color } => color,
        }
    }
}

impl Default for SegmentColoring {
    fn default() -> Self {
        Self::ByMoveKind {
            rapid: Color::RED,
            milling: Color::BLUE,
        }
    }
}

/// Named style preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StylePreset {
    /// Rapid moves red, milling moves blue
    #[default]
    Milling,
    /// All segments red
    Legacy,
}

impl fmt::Display for StylePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Milling => write!(f, "milling"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

impl FromStr for StylePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "milling" => Ok(Self::Milling),
            "legacy" => Ok(Self::Legacy),
            other => Err(format!("Unknown style '{}': expected milling or legacy", other)),
        }
    }
}

/// Visual parameters of an assembled scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneStyle {
    pub coloring: SegmentColoring,
    pub background: Color,
    /// Exponential-squared fog density, in 1/render units
    pub fog_density: f32,
    pub fine_grid_center: Color,
    pub fine_grid_line: Color,
    pub coarse_grid: Color,
    pub tool_marker: Color,
}

impl SceneStyle {
    /// Default style: rapid moves red, milling moves blue.
    pub fn milling() -> Self {
        Self {
            coloring: SegmentColoring::default(),
            background: Color::from_hex(0xcccccc),
            fog_density: 0.0005,
            fine_grid_center: Color::from_hex(0x444444),
            fine_grid_line: Color::from_hex(0x888888),
            coarse_grid: Color::RED,
            tool_marker: Color::WHITE,
        }
    }

    /// Older single-color variant: every segment red.
    pub fn legacy() -> Self {
        Self {
            coloring: SegmentColoring::Uniform { color: Color::RED },
            ..Self::milling()
        }
    }

    pub fn from_preset(preset: StylePreset) -> Self {
        match preset {
            StylePreset::Milling => Self::milling(),
            StylePreset::Legacy => Self::legacy(),
        }
    }
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self::milling()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coloring_by_kind() {
        let coloring = SceneStyle::milling().coloring;
        assert_eq!(coloring.color_for(true), Color::RED);
        assert_eq!(coloring.color_for(false), Color::BLUE);
    }

    #[test]
    fn test_legacy_is_uniform() {
        let style = SceneStyle::legacy();
        assert_eq!(style.coloring.color_for(true), Color::RED);
        assert_eq!(style.coloring.color_for(false), Color::RED);
        assert_eq!(style.background, SceneStyle::milling().background);
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!("Legacy".parse::<StylePreset>(), Ok(StylePreset::Legacy));
        assert_eq!("milling".parse::<StylePreset>(), Ok(StylePreset::Milling));
        assert!("neon".parse::<StylePreset>().is_err());
        assert_eq!(
            SceneStyle::from_preset(StylePreset::Legacy),
            SceneStyle::legacy()
        );
    }
}
