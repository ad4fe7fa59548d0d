//! Application state

use latchkey_core::{PasscodeConfirmationFlow, PasscodeUnlockFlow};
use zeroize::Zeroizing;

use crate::surface::TerminalSurface;

/// Current screen/view
pub enum Screen {
    /// New passcode, entered twice
    Create(PasscodeConfirmationFlow<TerminalSurface>),

    /// Passcode required to continue
    Unlock(PasscodeUnlockFlow<TerminalSurface>),

    /// Session unlocked; any key quits
    Unlocked,
}

impl Screen {
    /// Surface of the active flow, if a flow is on screen
    pub fn surface(&self) -> Option<&TerminalSurface> {
        match self {
            Screen::Create(flow) => Some(flow.surface()),
            Screen::Unlock(flow) => Some(flow.surface()),
            Screen::Unlocked => None,
        }
    }

    /// Breadcrumb title for the screen
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Create(_) => "New Passcode",
            Screen::Unlock(_) => "Unlock",
            Screen::Unlocked => "Unlocked",
        }
    }
}

/// Terminal outcome reported by a flow's completion callback
pub enum Outcome {
    /// Creation finished; `None` when cancelled
    Created(Option<Zeroizing<String>>),
    /// Unlock finished; `false` when cancelled
    Unlocked(bool),
}
