//! Keyboard polling task.
//!
//! Runs alongside the frame loop and cancels the shared token on Ctrl+C, Escape or
//! 'q'. Returns as soon as the token is set by anyone.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use super::CancelToken;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Returns true for the key presses that stop the visualizer.
pub fn is_cancel_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }

    match key.code {
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') | KeyCode::Esc => true,
        _ => false,
    }
}

/// Blocks on terminal input until a cancel key arrives or the token is set elsewhere.
///
/// # Errors
/// - If polling or reading terminal events fails
pub fn poll_until_cancelled(cancel: CancelToken) -> std::io::Result<()> {
    while !cancel.is_cancelled() {
        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if is_cancel_key(&key) {
                tracing::info!("Cancel key pressed: {:?}", key.code);
                cancel.cancel();
                return Ok(());
            }
        }
    }

    Ok(())
}
