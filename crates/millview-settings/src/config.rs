//! Configuration for MillView
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats.
//!
//! Configuration is organized into logical sections:
//! - Scene settings (render scale, style preset, color overrides)
//! - Camera settings (projection and initial position)
//! - Orbit control settings (damping, distance and angle limits)
//! - Window settings

use crate::error::{ConfigError, SettingsError, SettingsResult};
use crate::style::{SceneStyle, SegmentColoring, StylePreset};
use millview_core::{Color, RenderUnit};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Scene settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Render units per millimeter
    pub render_unit: RenderUnit,
    /// Style preset the scene starts from
    pub preset: StylePreset,
    /// Overrides the preset's rapid color (per-kind coloring only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rapid_color: Option<Color>,
    /// Overrides the preset's milling color (per-kind coloring only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milling_color: Option<Color>,
    /// Tool diameter used when none is given, in millimeters
    pub default_tool_diameter: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            render_unit: RenderUnit::DEFAULT,
            preset: StylePreset::Milling,
            rapid_color: None,
            milling_color: None,
            default_tool_diameter: 1.0,
        }
    }
}

impl SceneSettings {
    /// Resolve the preset plus overrides into a concrete style.
    pub fn scene_style(&self) -> SceneStyle {
        self.scene_style_for(self.preset)
    }

    /// Same as [`scene_style`](Self::scene_style) with another preset.
    pub fn scene_style_for(&self, preset: StylePreset) -> SceneStyle {
        let mut style = SceneStyle::from_preset(preset);
        if let SegmentColoring::ByMoveKind { rapid, milling } = &mut style.coloring {
            if let Some(color) = self.rapid_color {
                *rapid = color;
            }
            if let Some(color) = self.milling_color {
                *milling = color;
            }
        }
        style
    }
}

/// Camera settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Initial camera position in render units
    pub position: [f32; 3],
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            near: 1.0,
            far: 10000.0,
            position: [0.0, 200.0, 400.0],
        }
    }
}

/// Orbit control settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per frame
    pub damping_factor: f32,
    /// Pan in screen space instead of the ground plane
    pub screen_space_panning: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angle ceiling in radians
    pub max_polar_angle: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.25,
            screen_space_panning: false,
            min_distance: 100.0,
            max_distance: 5000.0,
            max_polar_angle: std::f32::consts::FRAC_PI_2,
            rotate_speed: 0.05,
            zoom_speed: 1.0,
            pan_speed: 1.0,
        }
    }
}

/// Window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            title: "MillView".to_string(),
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub scene: SceneSettings,
    pub camera: CameraSettings,
    pub controls: ControlSettings,
    pub window: WindowSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )
            .into()),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("{}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let unit = self.scene.render_unit.get();
        if !(unit.is_finite() && unit > 0.0) {
            return Err(SettingsError::invalid("scene.render_unit", "must be > 0"));
        }

        if !(self.scene.default_tool_diameter.is_finite() && self.scene.default_tool_diameter > 0.0)
        {
            return Err(SettingsError::invalid(
                "scene.default_tool_diameter",
                "must be > 0",
            ));
        }

        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(SettingsError::invalid(
                "camera.fov_degrees",
                "must be between 0 and 180",
            ));
        }

        if camera.near <= 0.0 {
            return Err(SettingsError::invalid("camera.near", "must be > 0"));
        }

        if camera.near >= camera.far {
            return Err(SettingsError::invalid(
                "camera.far",
                "must be greater than camera.near",
            ));
        }

        let controls = &self.controls;
        if !(controls.damping_factor > 0.0 && controls.damping_factor <= 1.0) {
            return Err(ConfigError::ValueOutOfRange {
                key: "controls.damping_factor".to_string(),
                value: controls.damping_factor.to_string(),
            }
            .into());
        }

        if controls.min_distance < 0.0 || controls.min_distance > controls.max_distance {
            return Err(SettingsError::invalid(
                "controls.min_distance",
                "must be between 0 and controls.max_distance",
            ));
        }

        if !(controls.max_polar_angle > 0.0
            && controls.max_polar_angle <= std::f32::consts::PI)
        {
            return Err(ConfigError::ValueOutOfRange {
                key: "controls.max_polar_angle".to_string(),
                value: controls.max_polar_angle.to_string(),
            }
            .into());
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(SettingsError::invalid(
                "window",
                "dimensions must be > 0",
            ));
        }

        Ok(())
    }
}
