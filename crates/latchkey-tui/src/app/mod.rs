//! Application state and event handling

pub mod config;
mod state;

pub use config::TuiConfig;
pub use state::{Outcome, Screen};

use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use latchkey_core::{LockoutPolicy, PasscodeConfirmationFlow, PasscodeUnlockFlow};
use ratatui::prelude::*;
use zeroize::Zeroizing;

use crate::surface::{SurfaceEvent, TerminalSurface};
use crate::ui::{self, Theme};

/// How often the lockout countdown is re-evaluated
const TICK_RATE: Duration = Duration::from_millis(250);

/// Main application struct
pub struct App {
    /// Lockout state shared by every flow in this session
    pub lockout: LockoutPolicy,

    /// Current screen
    pub screen: Screen,

    /// Visual theme
    pub theme: Theme,

    /// Whether the app should quit
    pub should_quit: bool,

    passcode_length: usize,
    sender: mpsc::Sender<Outcome>,
    outcomes: mpsc::Receiver<Outcome>,
    last_tick: Instant,
}

impl App {
    /// Create an application from loaded configuration
    pub fn new(config: &TuiConfig) -> Self {
        Self::with_lockout(
            LockoutPolicy::new(config.lockout.clone()),
            config.passcode_length,
        )
    }

    /// Create an application around an existing lockout policy
    pub fn with_lockout(lockout: LockoutPolicy, passcode_length: usize) -> Self {
        let (sender, outcomes) = mpsc::channel();
        let screen = Self::create_screen(&sender, passcode_length);

        let mut app = Self {
            lockout,
            screen,
            theme: Theme::default(),
            should_quit: false,
            passcode_length,
            sender,
            outcomes,
            last_tick: Instant::now(),
        };
        app.start_screen();
        app
    }

    fn create_screen(sender: &mpsc::Sender<Outcome>, passcode_length: usize) -> Screen {
        let tx = sender.clone();
        let flow = PasscodeConfirmationFlow::new(
            TerminalSurface::new(passcode_length),
            move |passcode| {
                let _ = tx.send(Outcome::Created(passcode.map(Zeroizing::new)));
            },
        );
        Screen::Create(flow)
    }

    fn unlock_screen(&self, passcode: &str) -> Screen {
        let tx = self.sender.clone();
        let flow = PasscodeUnlockFlow::new(
            TerminalSurface::new(self.passcode_length),
            passcode,
            move |unlocked| {
                let _ = tx.send(Outcome::Unlocked(unlocked));
            },
        );
        Screen::Unlock(flow)
    }

    fn start_screen(&mut self) {
        match &mut self.screen {
            Screen::Create(flow) => flow.start(&self.lockout),
            Screen::Unlock(flow) => flow.start(&self.lockout),
            Screen::Unlocked => {}
        }
    }

    /// Run the application main loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, self))?;

            let timeout = TICK_RATE
                .checked_sub(self.last_tick.elapsed())
                .unwrap_or(Duration::ZERO);

            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if key.modifiers.contains(KeyModifiers::CONTROL)
                            && key.code == KeyCode::Char('c')
                        {
                            self.should_quit = true;
                        } else {
                            self.handle_key(key.code);
                        }
                    }
                }
            }

            if self.last_tick.elapsed() >= TICK_RATE {
                self.on_tick();
                self.last_tick = Instant::now();
            }
        }

        Ok(())
    }

    /// Handle key press events
    pub fn handle_key(&mut self, key: KeyCode) {
        match &mut self.screen {
            Screen::Create(flow) => match flow.surface_mut().handle_key(key) {
                Some(SurfaceEvent::Submit(passcode)) => {
                    let transition = flow.submit(&passcode, &self.lockout);
                    tracing::debug!(?transition, "Creation entry submitted");
                }
                Some(SurfaceEvent::Cancel) => {
                    flow.cancel();
                }
                None => {}
            },
            Screen::Unlock(flow) => match flow.surface_mut().handle_key(key) {
                Some(SurfaceEvent::Submit(passcode)) => {
                    let transition = flow.submit(&passcode, &mut self.lockout);
                    tracing::debug!(?transition, "Unlock entry submitted");
                }
                Some(SurfaceEvent::Cancel) => {
                    flow.cancel();
                }
                None => {}
            },
            Screen::Unlocked => self.should_quit = true,
        }

        self.process_outcomes();
    }

    /// Periodic refresh so countdowns advance and input re-enables
    pub fn on_tick(&mut self) {
        match &mut self.screen {
            Screen::Create(flow) => flow.refresh_display(&self.lockout),
            Screen::Unlock(flow) => flow.refresh_display(&self.lockout),
            Screen::Unlocked => {}
        }
    }

    fn process_outcomes(&mut self) {
        while let Ok(outcome) = self.outcomes.try_recv() {
            match outcome {
                Outcome::Created(Some(passcode)) => {
                    tracing::info!("New passcode set, locking session");
                    self.screen = self.unlock_screen(&passcode);
                    self.start_screen();
                }
                Outcome::Created(None) => {
                    tracing::info!("Passcode creation cancelled");
                    self.should_quit = true;
                }
                Outcome::Unlocked(true) => {
                    self.screen = Screen::Unlocked;
                }
                Outcome::Unlocked(false) => {
                    self.should_quit = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration as ChronoDuration;
    use latchkey_core::{LockoutConfig, ManualClock, Slot, Stage};

    use super::*;

    fn app() -> (App, ManualClock) {
        let clock = ManualClock::default();
        let lockout = LockoutPolicy::with_clock(
            LockoutConfig {
                max_failures: 2,
                first_freeze_secs: 60,
                second_freeze_secs: 300,
            },
            Arc::new(clock.clone()),
        );
        (App::with_lockout(lockout, 4), clock)
    }

    fn type_digits(app: &mut App, digits: &str) {
        for c in digits.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    fn focused_title(app: &App) -> String {
        let surface = app.screen.surface().unwrap();
        surface.slot(surface.focused()).title.clone()
    }

    #[test]
    fn test_create_then_unlock() {
        let (mut app, _) = app();
        assert_eq!(focused_title(&app), "Enter a passcode");

        type_digits(&mut app, "1234");
        assert_eq!(focused_title(&app), "Re-enter your passcode");

        type_digits(&mut app, "1234");
        assert!(matches!(app.screen, Screen::Unlock(_)));
        assert_eq!(focused_title(&app), "Enter your passcode");

        type_digits(&mut app, "1234");
        assert!(matches!(app.screen, Screen::Unlocked));

        app.handle_key(KeyCode::Enter);
        assert!(app.should_quit);
    }

    #[test]
    fn test_mismatch_stays_on_create() {
        let (mut app, _) = app();

        type_digits(&mut app, "1234");
        type_digits(&mut app, "4321");

        match &app.screen {
            Screen::Create(flow) => {
                assert_eq!(flow.stage(), Some(Stage::First));
                assert_eq!(
                    flow.surface().slot(Slot::First).message,
                    "Passcode did not match.\nTry again"
                );
            }
            _ => panic!("expected create screen"),
        }
    }

    #[test]
    fn test_escape_cancels_creation() {
        let (mut app, _) = app();
        app.handle_key(KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_unlock_failures_freeze_until_tick() {
        let (mut app, clock) = app();
        type_digits(&mut app, "1234");
        type_digits(&mut app, "1234");

        type_digits(&mut app, "0000");
        type_digits(&mut app, "0000");
        assert!(app.lockout.is_frozen());
        assert_eq!(focused_title(&app), "Try again in 1 minute");

        // Typing is swallowed while frozen
        type_digits(&mut app, "1234");
        assert!(matches!(app.screen, Screen::Unlock(_)));
        assert_eq!(app.lockout.failure_count(), 2);

        clock.advance(ChronoDuration::seconds(60));
        app.on_tick();
        assert_eq!(focused_title(&app), "Enter your passcode");

        type_digits(&mut app, "1234");
        assert!(matches!(app.screen, Screen::Unlocked));
        assert_eq!(app.lockout.failure_count(), 0);
    }
}
