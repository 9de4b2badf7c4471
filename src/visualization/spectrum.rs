//! Frequency spectrum transform using a real-input FFT.
//!
//! A terminal `width` columns wide shows `width` bins, DC on the left and Nyquist on
//! the right, computed from `2 × (width − 1)` samples.

use realfft::{RealFftPlanner, RealToComplex};
use rustfft::num_complex::Complex;
use std::sync::Arc;

/// Empirical normalisation for typical 16-bit PCM amplitudes.
const MAGNITUDE_NORMALIZATION: f64 = 1e5;

/// Smallest width for which a real transform is defined.
pub const MIN_WIDTH: usize = 2;

/// Number of real input samples needed for `width` output bins.
pub fn sample_count(width: usize) -> usize {
    2 * (width.max(MIN_WIDTH) - 1)
}

/// FFT plan and buffers sized for one terminal width.
///
/// Never resized in place; a width change replaces the whole context.
pub struct SpectrumContext {
    width: usize,
    fft: Arc<dyn RealToComplex<f64>>,
    block: Vec<i16>,
    input: Vec<f64>,
    output: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
    magnitudes: Vec<f64>,
}

impl SpectrumContext {
    /// Plans a transform for `width` bins. Widths below [`MIN_WIDTH`] are raised to it.
    pub fn new(width: usize) -> Self {
        let width = width.max(MIN_WIDTH);
        let samples = sample_count(width);

        // A fresh planner per context so no plan outlives its buffers.
        let fft = RealFftPlanner::<f64>::new().plan_fft_forward(samples);
        let input = fft.make_input_vec();
        let output = fft.make_output_vec();
        let scratch = fft.make_scratch_vec();

        Self {
            width,
            fft,
            block: vec![0; samples],
            input,
            output,
            scratch,
            magnitudes: vec![0.0; width],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn bins(&self) -> usize {
        self.output.len()
    }

    pub fn sample_count(&self) -> usize {
        self.input.len()
    }

    pub fn block_mut(&mut self) -> &mut [i16] {
        &mut self.block
    }

    /// Transforms the current block into per-column bar heights.
    ///
    /// Column `c` gets `|bin[c]| / 1e5 × height_units / scale`, i.e. a height in
    /// half-cell units.
    ///
    /// # Errors
    /// - If the FFT rejects the buffer lengths
    pub fn magnitudes(
        &mut self,
        height_units: usize,
        scale: f64,
    ) -> Result<&[f64], realfft::FftError> {
        for (dst, &src) in self.input.iter_mut().zip(self.block.iter()) {
            *dst = f64::from(src);
        }

        self.fft
            .process_with_scratch(&mut self.input, &mut self.output, &mut self.scratch)?;

        let gain = height_units as f64 / MAGNITUDE_NORMALIZATION / scale;
        for (magnitude, bin) in self.magnitudes.iter_mut().zip(self.output.iter()) {
            *magnitude = bin.norm() * gain;
        }

        Ok(&self.magnitudes)
    }
}

/// Holds the current transform context and swaps it when the width changes.
pub struct Spectrum {
    scale: f64,
    context: Option<SpectrumContext>,
}

impl Spectrum {
    pub fn new(scale: f64) -> Self {
        Self {
            scale,
            context: None,
        }
    }

    /// Rebuilds the transform context if `width` differs from the current one.
    ///
    /// The previous context is dropped before the new plan is created.
    pub fn resize(&mut self, width: usize) {
        let width = width.max(MIN_WIDTH);
        if self.context().is_some_and(|c| c.width() == width) {
            return;
        }

        if let Some(old) = self.context.take() {
            tracing::debug!("Releasing spectrum context for width {}", old.width());
            drop(old);
        }
        let context = SpectrumContext::new(width);
        tracing::debug!(
            "Spectrum context planned: {} bins from {} samples",
            context.bins(),
            context.sample_count()
        );
        self.context = Some(context);
    }

    pub fn context(&self) -> Option<&SpectrumContext> {
        self.context.as_ref()
    }

    pub fn context_mut(&mut self) -> Option<&mut SpectrumContext> {
        self.context.as_mut()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}
