//! Latchkey TUI Library
//!
//! Terminal front-end for the latchkey passcode flows: creates a passcode,
//! then locks the session behind it with progressive lockout.

pub mod app;
pub mod surface;
pub mod ui;

pub use app::App;
