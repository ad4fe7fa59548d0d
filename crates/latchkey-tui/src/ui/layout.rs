//! Layout helpers for consistent screen structure

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::Theme;

/// Create a centered box for dialogs
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Render the one-line header bar
pub fn render_header(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let time_str = chrono::Local::now().format("%H:%M:%S").to_string();

    let header_text = Line::from(vec![
        Span::styled(" LATCHKEY ", theme.brand()),
        Span::raw(" "),
        Span::raw(title.to_string()),
        Span::raw(" ".repeat(area.width.saturating_sub(title.len() as u16 + 22) as usize)),
        Span::styled(format!(" {} ", time_str), theme.muted()),
    ]);

    let header = Paragraph::new(header_text).style(theme.header());
    frame.render_widget(header, area);
}
