//! Passcode entry screen shared by creation and unlock

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::surface::TerminalSurface;
use crate::ui::layout::centered_rect;

/// Draw the focused slot of a passcode surface
pub fn draw(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    surface: &TerminalSurface,
    dialog_title: &str,
    step: Option<&str>,
) {
    let theme = &app.theme;
    let view = surface.slot(surface.focused());

    // Center the entry dialog
    let dialog = centered_rect(60, 60, area);

    let block = Block::default()
        .title(dialog_title)
        .title_style(theme.brand())
        .borders(Borders::ALL)
        .border_style(theme.dialog_border(view.enabled));

    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(2), // Prompt
            Constraint::Length(2), // Message
            Constraint::Length(2), // Step indicator
            Constraint::Length(3), // Passcode display
            Constraint::Length(2), // Error
            Constraint::Length(1), // Countdown
            Constraint::Min(1),    // Spacer
            Constraint::Length(1), // Help
        ])
        .split(inner);

    // Prompt, or the countdown title while frozen
    let prompt = Paragraph::new(view.title.as_str())
        .style(theme.prompt(view.enabled))
        .alignment(Alignment::Center);
    frame.render_widget(prompt, chunks[0]);

    if !view.message.is_empty() {
        let message = Paragraph::new(view.message.as_str())
            .style(theme.hint())
            .alignment(Alignment::Center);
        frame.render_widget(message, chunks[1]);
    }

    if let Some(step) = step {
        let step_widget = Paragraph::new(step)
            .style(theme.muted())
            .alignment(Alignment::Center);
        frame.render_widget(step_widget, chunks[2]);
    }

    // Passcode display (masked)
    let typed = view.entry_len();
    let length = surface.passcode_length();
    let dots: Vec<Span> = (0..length)
        .flat_map(|i| {
            let filled = i < typed;
            let dot = Span::styled(if filled { "●" } else { "○" }, theme.digit(filled));
            [dot, Span::raw(" ")]
        })
        .collect();
    let mut line = vec![Span::raw("[ ")];
    line.extend(dots);
    line.push(Span::raw("]"));
    frame.render_widget(
        Paragraph::new(Line::from(line)).alignment(Alignment::Center),
        chunks[3],
    );

    if !view.error.is_empty() {
        let error_widget = Paragraph::new(view.error.as_str())
            .style(theme.error())
            .alignment(Alignment::Center);
        frame.render_widget(error_widget, chunks[4]);
    }

    if app.lockout.is_frozen() {
        let secs = app.lockout.remaining().num_seconds().max(0);
        let countdown = format!("Time remaining: {:02}:{:02}", secs / 60, secs % 60);
        let countdown_widget = Paragraph::new(countdown)
            .style(theme.countdown())
            .alignment(Alignment::Center);
        frame.render_widget(countdown_widget, chunks[5]);
    }

    let help = if view.enabled {
        format!("Type {} digits    [Esc] Cancel", length)
    } else {
        "Entry locked    [Esc] Cancel".to_string()
    };
    let help_widget = Paragraph::new(help)
        .style(theme.muted())
        .alignment(Alignment::Center);
    frame.render_widget(help_widget, chunks[7]);
}
