//! Input/display port implemented by the host UI

/// One of the two passcode entry slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Initial entry
    First,
    /// Re-entry for confirmation
    Confirm,
}

/// Commands a flow sends to the passcode entry surface
///
/// The surface owns rendering and keyboard handling. It reports completed
/// entries back by calling `submit`/`cancel` on the flow that drives it.
pub trait PasscodeSurface {
    /// Enable or disable typing into a slot
    fn set_enabled(&mut self, slot: Slot, enabled: bool);

    /// Prompt shown above a slot
    fn set_title(&mut self, slot: Slot, title: &str);

    /// Secondary hint shown under the prompt
    fn set_message(&mut self, slot: Slot, message: &str);

    /// Error line for a slot
    fn set_error(&mut self, slot: Slot, error: &str);

    /// Wipe whatever was typed into a slot
    fn clear_entry(&mut self, slot: Slot);

    /// Move keyboard focus to a slot
    fn focus(&mut self, slot: Slot);

    /// Close the surface; the flow has finished
    fn dismiss(&mut self);
}
