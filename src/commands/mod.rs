//! Command handlers for pcmviz.
//!
//! # Commands
//! - `visualize`: draw the live waveform or spectrum (default)
//! - `logs`: display recent log entries

pub mod logs;
pub mod visualize;

pub use logs::handle_logs;
pub use visualize::handle_visualize;
