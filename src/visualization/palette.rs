//! Foreground, background and intensity colours.

use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;

use super::glyph::intensity_index;
use crate::config::ConfigError;

/// Looks up one of the named terminal colours.
pub fn named_color(name: &str) -> Option<Color> {
    let color = match name {
        "default" => Color::Reset,
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        _ => return None,
    };
    Some(color)
}

/// Colour ramp used for intensity colouring of spectrum bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntensityMode {
    /// Five basic colours, blue through red
    #[default]
    Dumb,
    /// Sixteen steps from the 256-colour cube
    Extended,
    /// Nineteen steps of the 256-colour grey ramp
    Grayscale,
}

impl FromStr for IntensityMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dumb" => Ok(Self::Dumb),
            "256" => Ok(Self::Extended),
            "grayscale" => Ok(Self::Grayscale),
            other => Err(ConfigError::UnknownIntensityMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for IntensityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dumb => write!(f, "dumb"),
            Self::Extended => write!(f, "256"),
            Self::Grayscale => write!(f, "grayscale"),
        }
    }
}

const EXTENDED_RAMP: [u8; 16] = [
    21, 27, 39, 45, 51, 86, 85, 84, 82, 154, 192, 220, 214, 208, 202, 196,
];

const GRAYSCALE_STEPS: u8 = 19;

impl IntensityMode {
    /// Builds the ramp, low intensity first. `bright` selects the light variants
    /// of the basic colours.
    pub fn ramp(self, bright: bool) -> Vec<Color> {
        match self {
            Self::Dumb if bright => vec![
                Color::LightBlue,
                Color::LightCyan,
                Color::LightGreen,
                Color::LightYellow,
                Color::LightRed,
            ],
            Self::Dumb => vec![
                Color::Blue,
                Color::Cyan,
                Color::Green,
                Color::Yellow,
                Color::Red,
            ],
            Self::Extended => EXTENDED_RAMP.iter().map(|&i| Color::Indexed(i)).collect(),
            Self::Grayscale => (0..GRAYSCALE_STEPS)
                .map(|i| Color::Indexed(255 - GRAYSCALE_STEPS + i))
                .collect(),
        }
    }
}

/// Immutable colour state shared by the renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    on: Style,
    off: Color,
    intensity: Option<Vec<Color>>,
}

impl Palette {
    /// # Arguments
    /// * `color` - Foreground colour
    /// * `dim` - Disable bold and bright variants
    /// * `intensity` - Ramp for per-column colouring, `None` to disable
    pub fn new(color: Color, dim: bool, intensity: Option<IntensityMode>) -> Self {
        let mut on = Style::default().fg(color).bg(Color::Reset);
        if !dim {
            on = on.add_modifier(Modifier::BOLD);
        }

        Self {
            on,
            off: Color::Reset,
            intensity: intensity.map(|mode| mode.ramp(!dim)),
        }
    }

    /// Style for waveform points and uncoloured bars.
    pub fn on(&self) -> Style {
        self.on
    }

    /// Background used to clear the screen between frames.
    pub fn off(&self) -> Style {
        Style::default().fg(self.off).bg(self.off)
    }

    pub fn intensity_ramp(&self) -> Option<&[Color]> {
        self.intensity.as_deref().filter(|ramp| !ramp.is_empty())
    }

    /// Style for a spectrum column whose bar is `value` units out of `height_units`.
    pub fn column_style(&self, value: f64, height_units: usize) -> Style {
        match self.intensity_ramp() {
            Some(ramp) => self
                .on
                .fg(ramp[intensity_index(value, height_units, ramp.len())]),
            None => self.on,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(Color::Reset, false, None)
    }
}
