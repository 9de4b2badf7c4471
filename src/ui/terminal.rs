//! Scoped terminal takeover.
//!
//! Raw mode, the alternate screen and the hidden cursor are restored when the
//! session is dropped, on every exit path.

use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};

/// Guard owning the terminal's raw-mode state.
pub struct TerminalSession {
    active: bool,
}

impl TerminalSession {
    /// Enables raw mode and enters the alternate screen.
    ///
    /// If entering the alternate screen fails, raw mode is disabled again before
    /// the error is returned.
    ///
    /// # Errors
    /// - If raw mode cannot be enabled
    /// - If the alternate screen cannot be entered
    pub fn enter() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let session = Self { active: true };
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        tracing::debug!("Terminal session started");
        Ok(session)
    }

    /// Creates a ratatui terminal drawing to stdout.
    ///
    /// # Errors
    /// - If the backend cannot query the terminal
    pub fn terminal(&self) -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
        Ok(Terminal::new(CrosstermBackend::new(io::stdout()))?)
    }

    /// Restores the terminal. Safe to call more than once.
    ///
    /// # Errors
    /// - If raw mode cannot be disabled
    /// - If the alternate screen cannot be left
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
        tracing::debug!("Terminal session restored");
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            tracing::warn!("Failed to restore terminal: {e}");
        }
    }
}
