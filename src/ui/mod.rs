//! Terminal session management.

pub mod terminal;

pub use terminal::TerminalSession;
