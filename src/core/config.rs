//=========================================================================
// Shell Configuration
//=========================================================================
//
// Window and display settings, loadable from TOML.
//
// Every field has a default, so a config file only needs the keys it
// overrides:
//
// ```toml
// title = "Engine"
// fullscreen = false
// windowed_width = 800
// windowed_height = 600
// ```
//
// The `fullscreen` default follows the crate's `fullscreen` feature,
// which plays the role of a compile-time display-mode switch.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== Constants ===========================================================

/// Compile-time fullscreen default.
pub const FULL_SCREEN: bool = cfg!(feature = "fullscreen");

/// Default window width in windowed mode.
pub const DEFAULT_WINDOWED_WIDTH: u32 = 800;

/// Default window height in windowed mode.
pub const DEFAULT_WINDOWED_HEIGHT: u32 = 600;

/// Colour depth requested when switching the display to fullscreen.
pub const DEFAULT_COLOR_DEPTH: u16 = 32;

//=== ShellConfig =========================================================

/// Window and display settings for a [`crate::Shell`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Window title (also used as the application name).
    pub title: String,

    /// Use the desktop resolution instead of a centered window.
    pub fullscreen: bool,

    pub windowed_width: u32,
    pub windowed_height: u32,

    /// Bits per pixel requested for the fullscreen display mode.
    pub color_depth: u16,

    pub show_cursor: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            title: "Engine".to_string(),
            fullscreen: FULL_SCREEN,
            windowed_width: DEFAULT_WINDOWED_WIDTH,
            windowed_height: DEFAULT_WINDOWED_HEIGHT,
            color_depth: DEFAULT_COLOR_DEPTH,
            show_cursor: true,
        }
    }
}

impl ShellConfig {
    //--- Parsing ----------------------------------------------------------

    /// Parses a configuration from TOML text.
    ///
    /// The parsed values are checked with [`ShellConfig::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to TOML text.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    //--- Validation -------------------------------------------------------

    /// Rejects values no window can be created from: a zero windowed
    /// dimension or a zero colour depth.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.windowed_width == 0 || self.windowed_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "windowed size must be positive, got {}x{}",
                self.windowed_width, self.windowed_height
            )));
        }
        if self.color_depth == 0 {
            return Err(ConfigError::Invalid("color_depth must be positive".to_string()));
        }
        Ok(())
    }

    //--- File I/O ---------------------------------------------------------

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file can't be read and
    /// [`ConfigError::Parse`] if it isn't valid TOML for this schema,
    /// [`ConfigError::Invalid`] if the values fail validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        info!(target: "shell", "Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Loads a configuration file, falling back to defaults when it
    /// doesn't exist. Other I/O and parse errors are still returned.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(target: "shell", "No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Writes the configuration to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let text = self.to_toml_string()?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

//=== ConfigError =========================================================

/// Configuration loading and saving errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("serialization error: {0}")]
    Serialize(String),
}

//=========================================================================
// Unit Tests
//=========================================================================
