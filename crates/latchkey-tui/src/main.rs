//! Latchkey TUI - passcode creation and lock screen
//!
//! Asks for a new passcode twice, then locks the terminal behind it. Wrong
//! guesses freeze entry for progressively longer periods.

use std::io;
use std::panic;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use latchkey_core::LockoutConfig;
use latchkey_tui::app::TuiConfig;
use latchkey_tui::App;
use ratatui::prelude::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "latchkey-tui", version, about = "Passcode lock screen")]
struct Args {
    /// Path to a JSON configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Use the strict lockout preset (3 failures, 5 / 60 minute freezes)
    #[arg(long, conflicts_with = "lenient")]
    strict: bool,

    /// Use the lenient lockout preset (10 failures, 30 s / 2 minute freezes)
    #[arg(long)]
    lenient: bool,
}

/// Application entry point with panic handling for terminal restoration
fn main() -> Result<()> {
    let args = Args::parse();

    // Set up panic hook to restore terminal on crash
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(
            EnvFilter::from_default_env()
                .add_directive("latchkey_tui=info".parse()?)
                .add_directive("latchkey_core=info".parse()?),
        )
        .init();

    let mut config = match &args.config {
        Some(path) => TuiConfig::load_from(path),
        None => TuiConfig::load(),
    };
    if args.strict {
        config.lockout = LockoutConfig::strict();
    } else if args.lenient {
        config.lockout = LockoutConfig::lenient();
    }

    let result = run_app(&config);

    if let Err(e) = &result {
        tracing::error!("Application error: {}", e);
    }

    result
}

/// Main application runner
fn run_app(config: &TuiConfig) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let result = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
