//! Maps amplitudes onto half-block glyphs.
//!
//! Every terminal row holds two vertical sub-units, so a screen `height` rows tall
//! has `2 × height` units. Position `p` lives in row `p / 2`, top half when `p` is
//! even and bottom half when odd.

/// Full-scale amplitude of a signed 16-bit sample.
const FULL_SCALE: f64 = 32768.0;

/// Glyphs used by both visualizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// Waveform point in the top half of a cell.
    UpperHalf,
    /// Waveform point in the bottom half of a cell.
    LowerHalf,
    /// Spectrum bar covering a whole cell.
    Bar,
    /// Spectrum bar covering only the bottom half of a cell.
    BarTop,
}

impl Glyph {
    pub fn symbol(self) -> char {
        match self {
            Self::UpperHalf => '▀',
            Self::LowerHalf => '▄',
            Self::Bar => '┃',
            Self::BarTop => '╻',
        }
    }
}

/// A glyph placed at a cell row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub row: usize,
    pub glyph: Glyph,
}

/// Vertical sub-unit for a mean sample value, centred at `height_units / 2`.
///
/// Always within `[0, height_units)`; returns `None` when there is no room to draw.
pub fn wave_position(mean: f64, height_units: usize) -> Option<usize> {
    if height_units == 0 {
        return None;
    }

    let half_h = (height_units / 2) as f64;
    let pos = (mean / (FULL_SCALE / half_h) + half_h).floor();
    if pos.is_nan() || pos < 0.0 {
        return Some(0);
    }

    Some((pos as usize).min(height_units - 1))
}

/// Glyph for a waveform sub-unit position, chosen by parity.
pub fn wave_glyph(pos: usize) -> Placement {
    let glyph = if pos % 2 == 0 {
        Glyph::UpperHalf
    } else {
        Glyph::LowerHalf
    };

    Placement { row: pos / 2, glyph }
}

/// Cells making up a spectrum bar `value` units tall, growing from the bottom.
///
/// The bar height is truncated to whole units and clamped to `height_units`. An odd
/// height ends with a half bar on top.
pub fn spectrum_bar(value: f64, height_units: usize) -> Vec<Placement> {
    let h = height_units;
    let vi = if value.is_nan() || value <= 0.0 {
        0
    } else {
        (value as usize).min(h)
    };

    let mut cells: Vec<Placement> = (h - vi + 1..h)
        .rev()
        .map(|j| Placement {
            row: j / 2,
            glyph: Glyph::Bar,
        })
        .collect();

    if vi % 2 != 0 {
        cells.push(Placement {
            row: (h - vi) / 2,
            glyph: Glyph::BarTop,
        });
    }

    cells
}

/// Index into an intensity ramp of `ramp_len` colours for a bar of `value` units.
///
/// `round(value / height_units × (ramp_len − 1))`, clamped into the ramp.
pub fn intensity_index(value: f64, height_units: usize, ramp_len: usize) -> usize {
    if ramp_len == 0 || height_units == 0 {
        return 0;
    }

    let last = ramp_len - 1;
    let idx = (value / height_units as f64 * last as f64).round();
    if idx.is_nan() || idx <= 0.0 {
        0
    } else {
        (idx as usize).min(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_sits_at_centre() {
        // 80x24 terminal: 48 units, centre unit 24 is the top half of row 12.
        let pos = wave_position(0.0, 48).unwrap();
        assert_eq!(pos, 24);
        assert_eq!(
            wave_glyph(pos),
            Placement {
                row: 12,
                glyph: Glyph::UpperHalf
            }
        );
    }

    #[test]
    fn test_glyph_follows_parity() {
        for pos in 0..48 {
            let placement = wave_glyph(pos);
            assert_eq!(placement.row, pos / 2);
            let expected = if pos % 2 == 0 {
                Glyph::UpperHalf
            } else {
                Glyph::LowerHalf
            };
            assert_eq!(placement.glyph, expected);
        }
    }

    #[test]
    fn test_position_is_clamped_to_grid() {
        assert_eq!(wave_position(f64::from(i16::MIN), 48), Some(0));
        assert_eq!(wave_position(f64::from(i16::MAX), 48), Some(47));
        assert_eq!(wave_position(1e9, 48), Some(47));
        assert_eq!(wave_position(-1e9, 48), Some(0));
        assert_eq!(wave_position(f64::NAN, 48), Some(0));
        assert_eq!(wave_position(0.0, 0), None);
    }

    #[test]
    fn test_position_tracks_amplitude() {
        // Half scale positive lands a quarter of the height below centre.
        assert_eq!(wave_position(16384.0, 48), Some(36));
        assert_eq!(wave_position(-16384.0, 48), Some(12));
    }

    #[test]
    fn test_empty_bar() {
        assert!(spectrum_bar(0.0, 48).is_empty());
        assert!(spectrum_bar(0.9, 48).is_empty());
        assert!(spectrum_bar(-3.0, 48).is_empty());
    }

    #[test]
    fn test_single_unit_bar_is_half_glyph() {
        assert_eq!(
            spectrum_bar(1.0, 48),
            vec![Placement {
                row: 23,
                glyph: Glyph::BarTop
            }]
        );
    }

    #[test]
    fn test_even_bar_uses_full_glyphs_only() {
        let cells = spectrum_bar(4.0, 48);
        assert!(cells.iter().all(|c| c.glyph == Glyph::Bar));
        let mut rows: Vec<usize> = cells.iter().map(|c| c.row).collect();
        rows.dedup();
        assert_eq!(rows, vec![23, 22]);
    }

    #[test]
    fn test_odd_bar_ends_with_half_glyph() {
        let cells = spectrum_bar(5.0, 48);
        let top = cells.last().unwrap();
        assert_eq!(top.glyph, Glyph::BarTop);
        assert_eq!(top.row, 21);
        assert!(cells[..cells.len() - 1]
            .iter()
            .all(|c| c.glyph == Glyph::Bar && c.row >= 22));
    }

    #[test]
    fn test_bar_is_clamped_to_height() {
        let cells = spectrum_bar(500.0, 48);
        assert!(cells.iter().all(|c| c.row < 24));
        assert!(cells.iter().any(|c| c.row == 0));
        assert!(cells.iter().all(|c| c.glyph == Glyph::Bar));
    }

    #[test]
    fn test_intensity_index_rounds() {
        assert_eq!(intensity_index(0.0, 48, 5), 0);
        assert_eq!(intensity_index(24.0, 48, 5), 2);
        assert_eq!(intensity_index(48.0, 48, 5), 4);
        // 0.3 × 4 = 1.2 rounds down, 0.4 × 4 = 1.6 rounds up.
        assert_eq!(intensity_index(14.4, 48, 5), 1);
        assert_eq!(intensity_index(19.2, 48, 5), 2);
    }

    #[test]
    fn test_intensity_index_is_clamped() {
        assert_eq!(intensity_index(1000.0, 48, 16), 15);
        assert_eq!(intensity_index(-10.0, 48, 16), 0);
        assert_eq!(intensity_index(f64::NAN, 48, 19), 0);
        assert_eq!(intensity_index(10.0, 48, 1), 0);
        assert_eq!(intensity_index(10.0, 48, 0), 0);
    }
}
