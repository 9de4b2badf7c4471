//! Resize-aware render loop.
//!
//! Owns the sample block and transform buffers. Every frame it re-reads the terminal
//! size, rebuilds size-dependent buffers on change, pulls one block from the source,
//! draws it and flushes.

use anyhow::Context;
use ratatui::{backend::Backend, buffer::Buffer, Terminal};
use std::io::Read;

use super::glyph::{spectrum_bar, wave_glyph, wave_position, Placement};
use super::source::{BlockRead, SampleReader};
use super::spectrum::Spectrum;
use super::waveform::Waveform;
use super::{CancelToken, Palette};
use crate::config::{Visualization, VizConfig};

/// Frame loop lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for the first terminal size and buffer allocation
    Priming,
    /// Drawing one frame per sample block
    Streaming,
    /// Source exhausted, about to signal shutdown
    Draining,
    /// Finished, either drained or cancelled
    Terminated,
}

/// Terminal size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    /// Vertical resolution in half-cell units.
    pub fn height_units(&self) -> usize {
        self.height * 2
    }
}

/// The two visualizations, chosen once at startup.
pub enum Renderer {
    Waveform(Waveform),
    Spectrum(Spectrum),
}

impl Renderer {
    pub fn from_config(config: &VizConfig) -> Self {
        match config.visualization {
            Visualization::Wave => Self::Waveform(Waveform::new(config.step)),
            Visualization::Spectrum => Self::Spectrum(Spectrum::new(config.scale)),
        }
    }

    fn resize(&mut self, width: usize) {
        match self {
            Self::Waveform(waveform) => waveform.resize(width),
            Self::Spectrum(spectrum) => spectrum.resize(width),
        }
    }

    /// Block the next read should fill.
    fn block_mut(&mut self) -> &mut [i16] {
        match self {
            Self::Waveform(waveform) => waveform.block_mut(),
            Self::Spectrum(spectrum) => match spectrum.context_mut() {
                Some(context) => context.block_mut(),
                None => &mut [],
            },
        }
    }

    fn render(
        &mut self,
        buf: &mut Buffer,
        palette: &Palette,
        dims: Dimensions,
    ) -> anyhow::Result<()> {
        let height_units = dims.height_units();

        match self {
            Self::Waveform(waveform) => {
                for (col, &mean) in waveform.columns().iter().take(dims.width).enumerate() {
                    let Some(pos) = wave_position(mean, height_units) else {
                        break;
                    };
                    put(buf, col, wave_glyph(pos), palette.on());
                }
            }
            Self::Spectrum(spectrum) => {
                let scale = spectrum.scale();
                let Some(context) = spectrum.context_mut() else {
                    return Ok(());
                };
                let magnitudes = context
                    .magnitudes(height_units, scale)
                    .map_err(|e| anyhow::anyhow!("Spectrum transform failed: {e}"))?;

                for (col, &value) in magnitudes.iter().take(dims.width).enumerate() {
                    let style = palette.column_style(value, height_units);
                    for placement in spectrum_bar(value, height_units) {
                        put(buf, col, placement, style);
                    }
                }
            }
        }

        Ok(())
    }
}

/// Writes a glyph into the buffer, ignoring positions outside it.
fn put(buf: &mut Buffer, col: usize, placement: Placement, style: ratatui::style::Style) {
    let (Ok(x), Ok(y)) = (u16::try_from(col), u16::try_from(placement.row)) else {
        return;
    };
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(placement.glyph.symbol()).set_style(style);
    }
}

fn read_dimensions<B: Backend>(terminal: &Terminal<B>) -> anyhow::Result<Dimensions> {
    let size = terminal.size().context("Failed to query terminal size")?;
    Ok(Dimensions {
        width: size.width as usize,
        height: size.height as usize,
    })
}

/// Drives source, transform and terminal one frame at a time.
pub struct FrameLoop<R> {
    source: SampleReader<R>,
    renderer: Renderer,
    palette: Palette,
    cancel: CancelToken,
    state: LoopState,
    dims: Option<Dimensions>,
    frames: u64,
}

impl<R: Read> FrameLoop<R> {
    pub fn new(
        source: SampleReader<R>,
        renderer: Renderer,
        palette: Palette,
        cancel: CancelToken,
    ) -> Self {
        Self {
            source,
            renderer,
            palette,
            cancel,
            state: LoopState::Priming,
            dims: None,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Runs until the stream ends, the token is cancelled or a fatal error occurs.
    ///
    /// The token is always set on return so the controlling task wakes up.
    ///
    /// # Errors
    /// - Any I/O error from the source other than end of stream
    /// - Terminal size query or draw failures
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let result = self.drive(terminal);

        if let Err(e) = &result {
            tracing::error!("Frame loop failed after {} frames: {e:#}", self.frames);
            self.state = LoopState::Terminated;
        }
        self.cancel.cancel();
        tracing::debug!(
            "Frame loop finished in state {:?} after {} frames",
            self.state(),
            self.frames()
        );

        result
    }

    fn drive<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        while self.state != LoopState::Terminated {
            if self.cancel.is_cancelled() {
                tracing::debug!("Cancellation observed after {} frames", self.frames);
                self.state = LoopState::Terminated;
                break;
            }
            self.step(terminal)?;
        }
        Ok(())
    }

    /// Advances the state machine by one transition.
    ///
    /// # Errors
    /// - Fatal source, transform or terminal errors
    pub fn step<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<LoopState> {
        match self.state {
            LoopState::Priming => {
                let dims = read_dimensions(terminal)?;
                self.apply_dimensions(dims);
                self.state = LoopState::Streaming;
            }
            LoopState::Streaming => self.stream_frame(terminal)?,
            LoopState::Draining => {
                tracing::info!("PCM stream ended after {} frames", self.frames);
                self.cancel.cancel();
                self.state = LoopState::Terminated;
            }
            LoopState::Terminated => {}
        }

        Ok(self.state)
    }

    fn apply_dimensions(&mut self, dims: Dimensions) {
        if let Some(old) = self.dims {
            tracing::debug!(
                "Terminal resized from {}x{} to {}x{}",
                old.width,
                old.height,
                dims.width,
                dims.height
            );
        }
        self.renderer.resize(dims.width);
        self.dims = Some(dims);
    }

    fn stream_frame<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let dims = read_dimensions(terminal)?;
        if self.dims != Some(dims) {
            self.apply_dimensions(dims);
        }

        let read = self
            .source
            .read_block(self.renderer.block_mut())
            .context("Failed to read PCM stream")?;
        if read == BlockRead::EndOfStream {
            self.state = LoopState::Draining;
            return Ok(());
        }
        // The read may have blocked past cancellation and the terminal restore.
        if self.cancel.is_cancelled() {
            tracing::debug!("Cancelled while reading, dropping block");
            self.state = LoopState::Terminated;
            return Ok(());
        }

        let renderer = &mut self.renderer;
        let palette = &self.palette;
        let mut outcome = Ok(());
        terminal.draw(|frame| {
            let buf = frame.buffer_mut();
            let area = buf.area;
            buf.set_style(area, palette.off());
            outcome = renderer.render(buf, palette, dims);
        })?;
        outcome?;

        self.frames += 1;
        Ok(())
    }
}
