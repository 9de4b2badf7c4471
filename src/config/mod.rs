//! Configuration management for pcmviz.
//!
//! Settings come from an optional TOML file and are overridden by command-line
//! flags. The merged values are validated once into an immutable [`VizConfig`]
//! before the terminal is touched.

pub mod file;

pub use file::FileConfig;

use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::visualization::palette::{named_color, IntensityMode};
use crate::visualization::waveform::MAX_STEP;
use crate::visualization::Palette;

/// Invalid or unreadable configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown color \"{0}\"")]
    UnknownColor(String),

    #[error("Unsupported mode: \"{0}\"")]
    UnknownIntensityMode(String),

    #[error("Unknown visualisation \"{0}\"\nSupported: spectrum, wave")]
    UnknownVisualization(String),

    #[error("Step must be between 1 and {max}, got {0}", max = MAX_STEP)]
    InvalidStep(usize),

    #[error("Scale must be a positive number, got {0}")]
    InvalidScale(f64),

    #[error("Failed to parse {}: {1}", .0.display())]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Failed to read {}: {1}", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Could not determine home directory")]
    NoHomeDir,
}

/// Which visualization to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visualization {
    /// Time-domain waveform
    #[default]
    Wave,
    /// Frequency spectrum
    Spectrum,
}

impl FromStr for Visualization {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wave" => Ok(Self::Wave),
            "spectrum" => Ok(Self::Spectrum),
            other => Err(ConfigError::UnknownVisualization(other.to_string())),
        }
    }
}

impl std::fmt::Display for Visualization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wave => write!(f, "wave"),
            Self::Spectrum => write!(f, "spectrum"),
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub color: Option<String>,
    pub dim: bool,
    pub step: Option<usize>,
    pub scale: Option<f64>,
    pub icolor: bool,
    pub imode: Option<String>,
    pub file: Option<PathBuf>,
    pub viz: Option<String>,
}

/// Validated settings for one visualizer run.
#[derive(Debug, Clone, PartialEq)]
pub struct VizConfig {
    pub visualization: Visualization,
    /// Samples averaged per waveform column, 1 to [`MAX_STEP`]
    pub step: usize,
    /// Spectrum amplitude divisor, finite and positive
    pub scale: f64,
    /// PCM source path
    pub file: PathBuf,
    pub palette: Palette,
}

impl VizConfig {
    /// Merges `overrides` over `file` and validates the result.
    ///
    /// # Errors
    /// - Unknown colour, intensity mode or visualization name
    /// - `step` outside `1..=MAX_STEP`, or a non-positive or non-finite `scale`
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self, ConfigError> {
        let color_name = overrides.color.unwrap_or(file.color);
        let color =
            named_color(&color_name).ok_or_else(|| ConfigError::UnknownColor(color_name.clone()))?;

        let dim = overrides.dim || file.dim;
        let icolor = overrides.icolor || file.icolor;
        let imode: IntensityMode = overrides.imode.unwrap_or(file.imode).parse()?;
        let visualization: Visualization = overrides.viz.unwrap_or(file.viz).parse()?;

        let step = overrides.step.unwrap_or(file.step);
        if !(1..=MAX_STEP).contains(&step) {
            return Err(ConfigError::InvalidStep(step));
        }

        let scale = overrides.scale.unwrap_or(file.scale);
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::InvalidScale(scale));
        }

        Ok(Self {
            visualization,
            step,
            scale,
            file: overrides.file.unwrap_or(file.file),
            palette: Palette::new(color, dim, icolor.then_some(imode)),
        })
    }
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            visualization: Visualization::default(),
            step: 2,
            scale: 2.0,
            file: PathBuf::from("/tmp/mpd.fifo"),
            palette: Palette::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_defaults_resolve() {
        let config = VizConfig::resolve(FileConfig::default(), Overrides::default()).unwrap();
        assert_eq!(config, VizConfig::default());
        assert!(config.palette.intensity_ramp().is_none());
    }

    #[test]
    fn test_flags_override_file() {
        let file = FileConfig {
            viz: "spectrum".to_string(),
            step: 4,
            color: "red".to_string(),
            ..FileConfig::default()
        };
        let overrides = Overrides {
            step: Some(8),
            color: Some("cyan".to_string()),
            file: Some(PathBuf::from("/run/mpd/fifo")),
            ..Overrides::default()
        };

        let config = VizConfig::resolve(file, overrides).unwrap();
        assert_eq!(config.visualization, Visualization::Spectrum);
        assert_eq!(config.step, 8);
        assert_eq!(config.file, PathBuf::from("/run/mpd/fifo"));
        assert_eq!(config.palette.on().fg, Some(Color::Cyan));
    }

    #[test]
    fn test_icolor_enables_ramp() {
        let overrides = Overrides {
            icolor: true,
            imode: Some("grayscale".to_string()),
            ..Overrides::default()
        };
        let config = VizConfig::resolve(FileConfig::default(), overrides).unwrap();
        assert_eq!(config.palette.intensity_ramp().unwrap().len(), 19);
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        let bad_color = Overrides {
            color: Some("purple".to_string()),
            ..Overrides::default()
        };
        let err = VizConfig::resolve(FileConfig::default(), bad_color).unwrap_err();
        assert_eq!(err.to_string(), "Unknown color \"purple\"");

        let bad_mode = Overrides {
            imode: Some("rainbow".to_string()),
            ..Overrides::default()
        };
        assert!(matches!(
            VizConfig::resolve(FileConfig::default(), bad_mode),
            Err(ConfigError::UnknownIntensityMode(_))
        ));

        let bad_viz = Overrides {
            viz: Some("bars".to_string()),
            ..Overrides::default()
        };
        let err = VizConfig::resolve(FileConfig::default(), bad_viz).unwrap_err();
        assert!(err.to_string().contains("Supported: spectrum, wave"));
    }

    #[test]
    fn test_numeric_bounds() {
        let zero_step = Overrides {
            step: Some(0),
            ..Overrides::default()
        };
        assert!(matches!(
            VizConfig::resolve(FileConfig::default(), zero_step),
            Err(ConfigError::InvalidStep(0))
        ));

        for step in [MAX_STEP + 1, 1_000_000_000, usize::MAX] {
            let overrides = Overrides {
                step: Some(step),
                ..Overrides::default()
            };
            let err = VizConfig::resolve(FileConfig::default(), overrides).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidStep(s) if s == step));
        }

        let largest = Overrides {
            step: Some(MAX_STEP),
            ..Overrides::default()
        };
        assert_eq!(
            VizConfig::resolve(FileConfig::default(), largest).unwrap().step,
            MAX_STEP
        );

        for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let overrides = Overrides {
                scale: Some(scale),
                ..Overrides::default()
            };
            assert!(matches!(
                VizConfig::resolve(FileConfig::default(), overrides),
                Err(ConfigError::InvalidScale(_))
            ));
        }
    }
}
