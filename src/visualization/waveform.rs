//! Time-domain waveform transform.
//!
//! Each terminal column shows the mean of `step` consecutive samples.

/// Largest accepted `step`. Keeps a full-width block (65535 columns) under 128 MiB.
pub const MAX_STEP: usize = 1024;

/// Averages `step` consecutive samples into one value per column.
///
/// `samples` holds `columns × step` samples; trailing samples that do not fill a
/// whole column are ignored.
///
/// # Arguments
/// * `samples` - Raw PCM block
/// * `step` - Samples per column (at least 1)
/// * `out` - Reused output buffer, resized to the column count
pub fn average_columns(samples: &[i16], step: usize, out: &mut Vec<f64>) {
    let step = step.max(1);
    out.clear();
    out.extend(samples.chunks_exact(step).map(|column| {
        let sum: f64 = column.iter().map(|&s| f64::from(s)).sum();
        sum / step as f64
    }));
}

/// Owns the sample block and column means for waveform mode.
pub struct Waveform {
    step: usize,
    block: Vec<i16>,
    columns: Vec<f64>,
}

impl Waveform {
    pub fn new(step: usize) -> Self {
        Self {
            step: step.clamp(1, MAX_STEP),
            block: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Resizes the sample block for a new terminal width.
    pub fn resize(&mut self, width: usize) {
        let len = width.max(1).saturating_mul(self.step);
        if self.block.len() != len {
            self.block = vec![0; len];
            self.columns = Vec::with_capacity(width);
        }
    }

    pub fn block_mut(&mut self) -> &mut [i16] {
        &mut self.block
    }

    /// Averages the current block and returns one mean per column.
    pub fn columns(&mut self) -> &[f64] {
        average_columns(&self.block, self.step, &mut self.columns);
        &self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_step_one_is_identity() {
        let mut out = Vec::new();
        average_columns(&[3, -7, 12], 1, &mut out);
        assert_eq!(out, vec![3.0, -7.0, 12.0]);
    }

    #[test]
    fn test_mean_per_column() {
        let mut out = Vec::new();
        average_columns(&[1, 2, 10, 11, -4, -5], 2, &mut out);
        assert_eq!(out, vec![1.5, 10.5, -4.5]);
    }

    #[test]
    fn test_mean_matches_exact_average_for_any_step() {
        let samples: Vec<i16> = (0..360).map(|i| ((i * 7919) % 2000 - 1000) as i16).collect();
        let mut out = Vec::new();

        for step in 1..=12 {
            average_columns(&samples, step, &mut out);
            assert_eq!(out.len(), samples.len() / step);
            for (c, &mean) in out.iter().enumerate() {
                let expected: i64 = samples[c * step..(c + 1) * step]
                    .iter()
                    .map(|&s| i64::from(s))
                    .sum();
                assert_relative_eq!(mean, expected as f64 / step as f64, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        let mut out = Vec::new();
        average_columns(&[i16::MAX, i16::MAX, i16::MIN, i16::MIN], 2, &mut out);
        assert_eq!(out, vec![32767.0, -32768.0]);
    }

    #[test]
    fn test_resize_block_tracks_width() {
        let mut waveform = Waveform::new(3);
        waveform.resize(80);
        assert_eq!(waveform.block_mut().len(), 240);
        waveform.resize(40);
        assert_eq!(waveform.block_mut().len(), 120);
        assert_eq!(waveform.columns().len(), 40);
    }

    #[test]
    fn test_huge_step_is_capped() {
        let mut waveform = Waveform::new(usize::MAX / 2);
        waveform.resize(80);
        assert_eq!(waveform.block_mut().len(), 80 * MAX_STEP);
        assert_eq!(waveform.columns().len(), 80);
    }

    #[test]
    fn test_zero_step_treated_as_one() {
        let mut waveform = Waveform::new(0);
        waveform.resize(10);
        assert_eq!(waveform.block_mut().len(), 10);
        assert_eq!(waveform.columns().len(), 10);
    }
}
