//! Configuration file management for pcmviz.
//!
//! The file is optional. Every key falls back to the built-in default, and
//! command-line flags override whatever the file sets.

use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::ConfigError;

/// Raw, unvalidated settings as they appear in `pcmviz.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Foreground colour name ("default", "red", "cyan", ...)
    pub color: String,
    /// Turn off bold and bright colours
    pub dim: bool,
    /// Samples averaged into each waveform column
    pub step: usize,
    /// Spectrum amplitude divisor
    pub scale: f64,
    /// Colour spectrum bars by intensity
    pub icolor: bool,
    /// Intensity ramp: "dumb", "256" or "grayscale"
    pub imode: String,
    /// Where to read PCM data from
    pub file: PathBuf,
    /// Visualization: "wave" or "spectrum"
    pub viz: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            color: "default".to_string(),
            dim: false,
            step: 2,
            scale: 2.0,
            icolor: false,
            imode: "dumb".to_string(),
            file: PathBuf::from("/tmp/mpd.fifo"),
            viz: "wave".to_string(),
        }
    }
}

impl FileConfig {
    /// Loads the configuration from `path`, or defaults if the file does not exist.
    ///
    /// # Errors
    /// - If the file exists but cannot be read
    /// - If the TOML is malformed or has unknown keys
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(path.to_path_buf(), e)),
        };

        let config = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        tracing::debug!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Loads from the default location, `~/.config/pcmviz/pcmviz.toml`.
    ///
    /// # Errors
    /// - If the home directory cannot be determined
    /// - See [`FileConfig::load_from`]
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_config_path()?)
    }
}

/// Retrieves the path of the default config file.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".config").join("pcmviz").join("pcmviz.toml"))
}
