//! Palette for the passcode screens

use ratatui::style::{Color, Modifier, Style};

/// Colors used by the lock screen
///
/// Styles are named after what they paint rather than their color, so the
/// entry dialog reads the same whether it is creating or unlocking.
pub struct Theme {
    pub accent: Color,
    pub header_bg: Color,
    pub frozen: Color,
    pub countdown: Color,
    pub accepted: Color,
    pub idle_border: Color,
    pub text: Color,
    pub hint: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(0, 188, 212),    // cyan
            header_bg: Color::Rgb(33, 33, 33),  // near black
            frozen: Color::Rgb(244, 67, 54),    // red
            countdown: Color::Rgb(255, 152, 0), // amber
            accepted: Color::Rgb(76, 175, 80),  // green
            idle_border: Color::Rgb(66, 66, 66),
            text: Color::Rgb(250, 250, 250),
            hint: Color::Rgb(189, 189, 189),
            muted: Color::Rgb(117, 117, 117),
        }
    }
}

impl Theme {
    /// Header bar background
    pub fn header(&self) -> Style {
        Style::default().fg(self.text).bg(self.header_bg)
    }

    /// Product name and dialog titles
    pub fn brand(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Slot prompt; turns red while entry is frozen
    pub fn prompt(&self, enabled: bool) -> Style {
        if enabled {
            self.brand()
        } else {
            self.error()
        }
    }

    /// Dialog border; turns red while entry is frozen
    pub fn dialog_border(&self, enabled: bool) -> Style {
        if enabled {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(self.frozen)
        }
    }

    /// Border for dialogs that take no input
    pub fn idle_border(&self) -> Style {
        Style::default().fg(self.idle_border)
    }

    /// Mismatch and wrong-passcode hints
    pub fn hint(&self) -> Style {
        Style::default().fg(self.hint)
    }

    /// Step indicator, key help and the header clock
    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Failure count and frozen prompt
    pub fn error(&self) -> Style {
        Style::default().fg(self.frozen).add_modifier(Modifier::BOLD)
    }

    pub fn countdown(&self) -> Style {
        Style::default().fg(self.countdown)
    }

    pub fn accepted(&self) -> Style {
        Style::default().fg(self.accepted)
    }

    /// One masked digit: filled once typed, hollow otherwise
    pub fn digit(&self, filled: bool) -> Style {
        if filled {
            Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.muted)
        }
    }
}
