//! Live PCM visualization.
//!
//! Samples flow from the [`source`] reader through one of the two transforms
//! ([`waveform`] or [`spectrum`]), are mapped to half-block glyphs by [`glyph`]
//! and drawn by the [`frame_loop`]. The [`input`] task and the controlling task
//! share a [`CancelToken`] for shutdown.

pub mod cancel;
pub mod frame_loop;
pub mod glyph;
pub mod input;
pub mod palette;
pub mod source;
pub mod spectrum;
pub mod waveform;

pub use cancel::CancelToken;
pub use frame_loop::{FrameLoop, Renderer};
pub use palette::Palette;
pub use source::SampleReader;
