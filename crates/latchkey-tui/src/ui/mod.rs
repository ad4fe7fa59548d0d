//! UI rendering

pub mod layout;
pub mod screens;
mod theme;

pub use theme::Theme;

use latchkey_core::Stage;
use ratatui::prelude::*;

use crate::app::{App, Screen};

/// Main render function - delegates to appropriate screen
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(10)])
        .split(frame.area());

    layout::render_header(frame, chunks[0], app.screen.title(), &app.theme);

    match &app.screen {
        Screen::Create(flow) => {
            let step = flow.stage().map(|stage| match stage {
                Stage::First => "Step 1 of 2: Choose a passcode",
                Stage::Confirm => "Step 2 of 2: Confirm passcode",
            });
            screens::passcode::draw(frame, chunks[1], app, flow.surface(), " New Passcode ", step)
        }
        Screen::Unlock(flow) => {
            screens::passcode::draw(frame, chunks[1], app, flow.surface(), " Unlock ", None)
        }
        Screen::Unlocked => screens::unlocked::draw(frame, chunks[1], app),
    }
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::app::TuiConfig;

    fn rendered(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_create_screen_renders_prompt() {
        let app = App::new(&TuiConfig::default());
        let screen = rendered(&app);

        assert!(screen.contains("New Passcode"));
        assert!(screen.contains("Enter a passcode"));
        assert!(screen.contains("Step 1 of 2"));
    }

    #[test]
    fn test_unlocked_screen_renders() {
        let mut app = App::new(&TuiConfig::default());
        for c in "12341234".chars() {
            app.handle_key(crossterm::event::KeyCode::Char(c));
        }
        for c in "1234".chars() {
            app.handle_key(crossterm::event::KeyCode::Char(c));
        }

        assert!(rendered(&app).contains("Unlocked"));
    }
}
