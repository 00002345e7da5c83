//! Settings Persistence
//!
//! Resolves the platform configuration directory and loads or saves the
//! application config there. A missing config file is not an error: the
//! defaults are used until the first save.

use crate::config::Config;
use crate::error::{ConfigError, SettingsError, SettingsResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory name under the platform config directory
pub const APP_DIR_NAME: &str = "millview";

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Platform config directory for MillView (e.g. `~/.config/millview`).
pub fn config_dir() -> SettingsResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string()).into())
}

/// Create the config directory if needed and return it.
pub fn ensure_config_dir() -> SettingsResult<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir)
        .map_err(|e| SettingsError::ConfigDirectory(format!("{}: {}", dir.display(), e)))?;
    Ok(dir)
}

/// Default location of the config file.
pub fn default_config_path() -> SettingsResult<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Settings persistence layer
///
/// Holds the active config together with the file it belongs to.
#[derive(Debug, Clone)]
pub struct SettingsPersistence {
    path: PathBuf,
    config: Config,
}

impl SettingsPersistence {
    /// Persistence bound to `path`, holding the default config
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Config::default(),
        }
    }

    /// Load from `path`, falling back to defaults if the file does not exist
    pub fn load_or_default(path: impl Into<PathBuf>) -> SettingsResult<Self> {
        let path = path.into();
        let config = if path.exists() {
            let config = Config::load_from_file(&path)?;
            info!(path = %path.display(), "loaded configuration");
            config
        } else {
            debug!(path = %path.display(), "no configuration file, using defaults");
            Config::default()
        };
        Ok(Self { path, config })
    }

    /// Load from the platform default location
    pub fn load_default() -> SettingsResult<Self> {
        Self::load_or_default(default_config_path()?)
    }

    /// Save the config to its file, creating parent directories as needed
    pub fn save(&self) -> SettingsResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e))
            })?;
        }
        self.config.save_to_file(&self.path)?;
        debug!(path = %self.path.display(), "saved configuration");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get reference to config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get mutable reference to config
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn into_config(self) -> Config {
        self.config
    }

    /// Validate settings
    pub fn validate(&self) -> SettingsResult<()> {
        self.config.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_layout() {
        if let Ok(path) = default_config_path() {
            assert!(path.ends_with("millview/config.toml"));
        }
    }

    #[test]
    fn test_new_holds_defaults() {
        let persistence = SettingsPersistence::new("settings.json");
        assert_eq!(persistence.config(), &Config::default());
        assert_eq!(persistence.path(), Path::new("settings.json"));
        assert!(persistence.validate().is_ok());
    }
}
