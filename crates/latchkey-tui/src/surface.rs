//! Terminal implementation of the passcode surface
//!
//! Holds what each slot should display and what has been typed into it.
//! Keystrokes are translated into submit/cancel events for the active flow.

use std::fmt;

use crossterm::event::KeyCode;
use latchkey_core::{PasscodeSurface, Slot};
use zeroize::Zeroizing;

/// Display state and typed digits for one slot
#[derive(Default)]
pub struct SlotView {
    pub title: String,
    pub message: String,
    pub error: String,
    pub enabled: bool,
    entry: Zeroizing<String>,
}

impl SlotView {
    fn enabled() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    /// Number of digits typed so far
    pub fn entry_len(&self) -> usize {
        self.entry.len()
    }
}

impl fmt::Debug for SlotView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotView")
            .field("title", &self.title)
            .field("message", &self.message)
            .field("error", &self.error)
            .field("enabled", &self.enabled)
            .field("entry_len", &self.entry.len())
            .finish()
    }
}

/// Event produced by a keystroke
pub enum SurfaceEvent {
    /// The focused slot is full
    Submit(Zeroizing<String>),
    /// User pressed Esc
    Cancel,
}

/// Two-slot passcode surface rendered by the TUI
#[derive(Debug)]
pub struct TerminalSurface {
    first: SlotView,
    confirm: SlotView,
    focused: Slot,
    dismissed: bool,
    passcode_length: usize,
}

impl TerminalSurface {
    /// Create a surface accepting passcodes of the given length
    ///
    /// Both slots start enabled; flows disable the active one while frozen.
    pub fn new(passcode_length: usize) -> Self {
        Self {
            first: SlotView::enabled(),
            confirm: SlotView::enabled(),
            focused: Slot::First,
            dismissed: false,
            passcode_length: passcode_length.max(1),
        }
    }

    /// View model for one slot
    pub fn slot(&self, slot: Slot) -> &SlotView {
        match slot {
            Slot::First => &self.first,
            Slot::Confirm => &self.confirm,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut SlotView {
        match slot {
            Slot::First => &mut self.first,
            Slot::Confirm => &mut self.confirm,
        }
    }

    /// Slot receiving key presses
    pub fn focused(&self) -> Slot {
        self.focused
    }

    /// Whether the flow has closed this surface
    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    /// Digits needed before an entry submits
    pub fn passcode_length(&self) -> usize {
        self.passcode_length
    }

    /// Translate a key press into an event for the flow
    ///
    /// Digits fill the focused slot and submit it once full. Anything that
    /// is not a digit, Backspace or Esc is ignored, as is typing into a
    /// disabled slot.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<SurfaceEvent> {
        if self.dismissed {
            return None;
        }

        let length = self.passcode_length;
        let view = self.slot_mut(self.focused);

        match key {
            KeyCode::Esc => Some(SurfaceEvent::Cancel),
            KeyCode::Backspace if view.enabled => {
                view.entry.pop();
                None
            }
            KeyCode::Char(c) if c.is_ascii_digit() && view.enabled => {
                if view.entry.len() < length {
                    view.entry.push(c);
                }
                if view.entry.len() == length {
                    Some(SurfaceEvent::Submit(Zeroizing::new(view.entry.as_str().to_owned())))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl PasscodeSurface for TerminalSurface {
    fn set_enabled(&mut self, slot: Slot, enabled: bool) {
        self.slot_mut(slot).enabled = enabled;
    }

    fn set_title(&mut self, slot: Slot, title: &str) {
        self.slot_mut(slot).title = title.to_string();
    }

    fn set_message(&mut self, slot: Slot, message: &str) {
        self.slot_mut(slot).message = message.to_string();
    }

    fn set_error(&mut self, slot: Slot, error: &str) {
        self.slot_mut(slot).error = error.to_string();
    }

    fn clear_entry(&mut self, slot: Slot) {
        self.slot_mut(slot).entry.clear();
    }

    fn focus(&mut self, slot: Slot) {
        self.focused = slot;
    }

    fn dismiss(&mut self) {
        self.dismissed = true;
        self.first.entry.clear();
        self.confirm.entry.clear();
    }
}
