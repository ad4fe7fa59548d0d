//! Passcode verification with progressive lockout
//!
//! Each wrong entry is recorded as a lockout failure. Once the failure count
//! reaches the configured threshold every further wrong entry applies a
//! freeze, first the short one and then the long one. A correct entry clears
//! the lockout state.

use zeroize::Zeroizing;

use crate::lockout::LockoutPolicy;
use crate::surface::{PasscodeSurface, Slot};
use crate::Transition;

/// Prompt for the unlock slot
pub const UNLOCK_TITLE: &str = "Enter your passcode";
/// Hint shown after a wrong entry
pub const WRONG_PASSCODE_MESSAGE: &str = "Wrong passcode";

/// Lifecycle of an unlock flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockState {
    /// Waiting for the passcode
    Locked,
    /// Correct passcode entered
    Unlocked,
    /// User backed out
    Cancelled,
}

type Completion = Box<dyn FnOnce(bool)>;

/// Verifies entries against a passcode held in memory
pub struct PasscodeUnlockFlow<S: PasscodeSurface> {
    surface: S,
    expected: Zeroizing<String>,
    state: UnlockState,
    on_complete: Option<Completion>,
}

impl<S: PasscodeSurface> PasscodeUnlockFlow<S> {
    /// Create a locked flow
    ///
    /// `on_complete` receives `true` once unlocked, `false` on cancellation.
    pub fn new(
        surface: S,
        expected: impl Into<String>,
        on_complete: impl FnOnce(bool) + 'static,
    ) -> Self {
        Self {
            surface,
            expected: Zeroizing::new(expected.into()),
            state: UnlockState::Locked,
            on_complete: Some(Box::new(on_complete)),
        }
    }

    /// Render the prompt and focus the entry slot
    pub fn start(&mut self, lockout: &LockoutPolicy) {
        if self.state == UnlockState::Locked {
            self.refresh_display(lockout);
            self.surface.focus(Slot::First);
        }
    }

    /// Check an entry, recording a lockout failure when it is wrong
    pub fn submit(&mut self, value: &str, lockout: &mut LockoutPolicy) -> Transition {
        if self.state != UnlockState::Locked {
            return Transition::Ignored;
        }

        if lockout.is_frozen() {
            tracing::warn!("Passcode submitted while entry is frozen, ignoring");
            self.refresh_display(lockout);
            return Transition::Ignored;
        }

        if value == self.expected.as_str() {
            lockout.clear_state();
            self.finish(UnlockState::Unlocked);
            return Transition::Completed;
        }

        let threshold_reached = lockout.increment_failure();
        if threshold_reached {
            lockout.apply_freeze();
        }

        self.surface.clear_entry(Slot::First);
        self.surface.set_message(Slot::First, WRONG_PASSCODE_MESSAGE);
        self.refresh_display(lockout);

        Transition::Rejected { threshold_reached }
    }

    /// Abandon the unlock attempt
    pub fn cancel(&mut self) -> Transition {
        if self.state != UnlockState::Locked {
            return Transition::Ignored;
        }
        self.finish(UnlockState::Cancelled);
        Transition::Cancelled
    }

    /// Re-evaluate the lockout and update the prompt
    pub fn refresh_display(&mut self, lockout: &LockoutPolicy) {
        if self.state != UnlockState::Locked {
            return;
        }

        let frozen = lockout.is_frozen();
        self.surface.set_enabled(Slot::First, !frozen);

        if frozen {
            self.surface.set_title(Slot::First, &lockout.describe_lockout());
        } else {
            self.surface.set_title(Slot::First, UNLOCK_TITLE);
        }

        if lockout.failure_count() > 0 {
            self.surface.set_error(Slot::First, &lockout.describe_failures());
        } else {
            self.surface.set_error(Slot::First, "");
        }
    }

    fn finish(&mut self, state: UnlockState) {
        tracing::info!(?state, "Passcode unlock finished");
        self.state = state;
        self.surface.dismiss();
        if let Some(on_complete) = self.on_complete.take() {
            on_complete(state == UnlockState::Unlocked);
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> UnlockState {
        self.state
    }

    /// Surface driven by this flow
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access for hosts that feed key presses into the surface
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::Arc;

    use chrono::Duration;

    use super::*;
    use crate::clock::ManualClock;
    use crate::lockout::LockoutConfig;
    use crate::surface::recording::{Command, RecordingSurface};

    fn setup() -> (
        PasscodeUnlockFlow<RecordingSurface>,
        LockoutPolicy,
        ManualClock,
        Rc<Cell<Option<bool>>>,
    ) {
        let clock = ManualClock::default();
        let lockout = LockoutPolicy::with_clock(
            LockoutConfig {
                max_failures: 3,
                first_freeze_secs: 60,
                second_freeze_secs: 600,
            },
            Arc::new(clock.clone()),
        );
        let result = Rc::new(Cell::new(None));
        let sink = Rc::clone(&result);
        let flow = PasscodeUnlockFlow::new(RecordingSurface::default(), "2468", move |ok| {
            sink.set(Some(ok))
        });
        (flow, lockout, clock, result)
    }

    #[test]
    fn test_correct_passcode_unlocks() {
        let (mut flow, mut lockout, _, result) = setup();
        flow.start(&lockout);

        assert_eq!(flow.submit("2468", &mut lockout), Transition::Completed);
        assert_eq!(flow.state(), UnlockState::Unlocked);
        assert_eq!(result.get(), Some(true));
        assert!(flow.surface().contains(&Command::Dismiss));
    }

    #[test]
    fn test_wrong_passcode_records_failure() {
        let (mut flow, mut lockout, _, result) = setup();

        assert_eq!(
            flow.submit("0000", &mut lockout),
            Transition::Rejected {
                threshold_reached: false
            }
        );
        assert_eq!(lockout.failure_count(), 1);
        assert!(!lockout.is_frozen());
        assert!(flow.surface().contains(&Command::ClearEntry(Slot::First)));
        assert!(flow
            .surface()
            .contains(&Command::Error(Slot::First, "1 Failed Passcode Attempts".into())));
        assert_eq!(result.get(), None);
    }

    #[test]
    fn test_threshold_freezes_entry() {
        let (mut flow, mut lockout, clock, _) = setup();

        flow.submit("0000", &mut lockout);
        flow.submit("0000", &mut lockout);
        assert_eq!(
            flow.submit("0000", &mut lockout),
            Transition::Rejected {
                threshold_reached: true
            }
        );
        assert!(lockout.is_frozen());
        assert_eq!(lockout.minutes_until_unfrozen(), 1);
        assert!(flow.surface().contains(&Command::Enabled(Slot::First, false)));

        // Even the right passcode is refused while frozen
        assert_eq!(flow.submit("2468", &mut lockout), Transition::Ignored);
        assert_eq!(lockout.failure_count(), 3);

        // Next failure past the threshold earns the long freeze
        clock.advance(Duration::seconds(60));
        flow.submit("0000", &mut lockout);
        assert_eq!(lockout.minutes_until_unfrozen(), 10);
    }

    #[test]
    fn test_unlock_clears_lockout_state() {
        let (mut flow, mut lockout, clock, _) = setup();
        for _ in 0..3 {
            flow.submit("0000", &mut lockout);
        }
        clock.advance(Duration::minutes(1));

        assert_eq!(flow.submit("2468", &mut lockout), Transition::Completed);
        assert_eq!(lockout.failure_count(), 0);
        assert!(!lockout.is_frozen());
    }

    #[test]
    fn test_cancel_reports_false_once() {
        let (mut flow, mut lockout, _, result) = setup();

        assert_eq!(flow.cancel(), Transition::Cancelled);
        assert_eq!(result.get(), Some(false));
        assert_eq!(flow.submit("2468", &mut lockout), Transition::Ignored);
        assert_eq!(flow.cancel(), Transition::Ignored);
        assert_eq!(flow.state(), UnlockState::Cancelled);
    }
}
