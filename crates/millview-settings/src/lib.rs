//! MillView Settings Crate
//!
//! Handles viewer configuration, scene style presets and settings persistence.

pub mod config;
pub mod error;
pub mod persistence;
pub mod style;

pub use config::{CameraSettings, Config, ControlSettings, SceneSettings, WindowSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
pub use persistence::{
    config_dir, default_config_path, ensure_config_dir, SettingsPersistence,
};
pub use style::{SceneStyle, SegmentColoring, StylePreset};
