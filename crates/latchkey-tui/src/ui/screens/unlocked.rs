//! Confirmation shown once the session is unlocked

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::ui::layout::centered_rect;

/// Draw the unlocked screen
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let dialog = centered_rect(50, 30, area);

    let block = Block::default()
        .title(" Unlocked ")
        .title_style(theme.brand())
        .borders(Borders::ALL)
        .border_style(theme.idle_border());

    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(2), Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let message = Paragraph::new("✓ Passcode accepted")
        .style(theme.accepted())
        .alignment(Alignment::Center);
    frame.render_widget(message, chunks[0]);

    let help = Paragraph::new("Press any key to quit")
        .style(theme.muted())
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[2]);
}
