//! Two-stage passcode creation: enter, then re-enter to confirm
//!
//! The flow starts at [`Stage::First`]. A submission there is stored and the
//! flow moves to [`Stage::Confirm`]. A matching second submission finishes the
//! flow; a mismatch discards the first entry and starts over at the first
//! slot with a "did not match" hint. Cancelling at either stage finishes the
//! flow without a passcode.
//!
//! A finished flow reports its outcome exactly once and ignores every event
//! after that.
//!
//! Mismatches here are not lockout failures. Only [`PasscodeUnlockFlow`]
//! feeds the failure counter.
//!
//! [`PasscodeUnlockFlow`]: crate::unlock::PasscodeUnlockFlow

use zeroize::Zeroizing;

use crate::lockout::LockoutPolicy;
use crate::surface::{PasscodeSurface, Slot};
use crate::Transition;

/// Prompt for the first slot
pub const FIRST_TITLE: &str = "Enter a passcode";
/// Prompt for the confirmation slot
pub const CONFIRM_TITLE: &str = "Re-enter your passcode";
/// Hint shown on the first slot after a mismatch
pub const MISMATCH_MESSAGE: &str = "Passcode did not match.\nTry again";

/// Which entry slot is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Waiting for the new passcode
    First,
    /// Waiting for the same passcode again
    Confirm,
}

impl Stage {
    /// Surface slot backing this stage
    pub fn slot(self) -> Slot {
        match self {
            Stage::First => Slot::First,
            Stage::Confirm => Slot::Confirm,
        }
    }
}

/// Lifecycle of a confirmation flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// Accepting input at the given stage
    Active(Stage),
    /// User backed out; no passcode was produced
    Cancelled,
    /// Both entries matched; the passcode went to the completion callback
    Confirmed,
}

type Completion = Box<dyn FnOnce(Option<String>)>;

/// State machine behind the "new passcode" interaction
pub struct PasscodeConfirmationFlow<S: PasscodeSurface> {
    surface: S,
    state: FlowState,
    first_entry: Option<Zeroizing<String>>,
    second_entry: Option<Zeroizing<String>>,
    on_complete: Option<Completion>,
}

impl<S: PasscodeSurface> PasscodeConfirmationFlow<S> {
    /// Create a flow at the first stage
    ///
    /// `on_complete` receives the new passcode, or `None` on cancellation.
    pub fn new(surface: S, on_complete: impl FnOnce(Option<String>) + 'static) -> Self {
        Self {
            surface,
            state: FlowState::Active(Stage::First),
            first_entry: None,
            second_entry: None,
            on_complete: Some(Box::new(on_complete)),
        }
    }

    /// Render the initial prompts and focus the active slot
    pub fn start(&mut self, lockout: &LockoutPolicy) {
        if let Some(stage) = self.stage() {
            self.refresh_display(lockout);
            self.surface.focus(stage.slot());
        }
    }

    /// Handle a completed entry from the active slot
    pub fn submit(&mut self, value: &str, lockout: &LockoutPolicy) -> Transition {
        let Some(stage) = self.stage() else {
            tracing::debug!("Ignoring submit on finished confirmation flow");
            return Transition::Ignored;
        };

        if lockout.is_frozen() {
            tracing::warn!("Passcode submitted while entry is frozen, ignoring");
            self.refresh_display(lockout);
            return Transition::Ignored;
        }

        match stage {
            Stage::First => {
                self.first_entry = Some(Zeroizing::new(value.to_owned()));
                self.second_entry = None;
                self.surface.clear_entry(Slot::Confirm);
                self.state = FlowState::Active(Stage::Confirm);
                self.surface.focus(Slot::Confirm);
                Transition::Advanced
            }
            Stage::Confirm => {
                self.second_entry = Some(Zeroizing::new(value.to_owned()));

                if self.first_entry() == Some(value) {
                    self.finish(FlowState::Confirmed, Some(value.to_owned()));
                    Transition::Completed
                } else {
                    tracing::debug!("Confirmation entry did not match, restarting");
                    self.first_entry = None;
                    self.surface.clear_entry(Slot::First);
                    self.state = FlowState::Active(Stage::First);
                    self.refresh_display(lockout);
                    self.surface.focus(Slot::First);
                    Transition::Mismatch
                }
            }
        }
    }

    /// Abandon passcode creation
    pub fn cancel(&mut self) -> Transition {
        if self.is_finished() {
            return Transition::Ignored;
        }
        self.finish(FlowState::Cancelled, None);
        Transition::Cancelled
    }

    /// Re-evaluate the lockout and update prompts accordingly
    ///
    /// Never changes the stage. Hosts call this periodically so the countdown
    /// stays current and input re-enables once the freeze has elapsed.
    pub fn refresh_display(&mut self, lockout: &LockoutPolicy) {
        let Some(stage) = self.stage() else {
            return;
        };
        let active = stage.slot();
        let frozen = lockout.is_frozen();

        self.surface.set_enabled(active, !frozen);

        if frozen {
            self.surface.set_title(active, &lockout.describe_lockout());
            self.surface.set_error(active, &lockout.describe_failures());
        } else {
            self.surface.set_error(active, "");
            self.surface.set_title(Slot::First, FIRST_TITLE);
            if self.second_entry.is_some() {
                self.surface.set_message(Slot::First, MISMATCH_MESSAGE);
            }
            self.surface.set_title(Slot::Confirm, CONFIRM_TITLE);
        }
    }

    fn finish(&mut self, state: FlowState, outcome: Option<String>) {
        tracing::info!(?state, "Passcode creation finished");
        self.state = state;
        self.first_entry = None;
        self.second_entry = None;
        self.surface.dismiss();
        if let Some(on_complete) = self.on_complete.take() {
            on_complete(outcome);
        }
    }

    /// Active stage, or `None` once finished
    pub fn stage(&self) -> Option<Stage> {
        match self.state {
            FlowState::Active(stage) => Some(stage),
            _ => None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Entry captured at the first stage, if any
    pub fn first_entry(&self) -> Option<&str> {
        self.first_entry.as_deref().map(String::as_str)
    }

    /// Whether the outcome has been reported
    pub fn is_finished(&self) -> bool {
        !matches!(self.state, FlowState::Active(_))
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
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    use super::*;
    use crate::clock::ManualClock;
    use crate::lockout::LockoutConfig;
    use crate::surface::recording::{Command, RecordingSurface};

    type Outcomes = Rc<RefCell<Vec<Option<String>>>>;

    fn flow() -> (PasscodeConfirmationFlow<RecordingSurface>, Outcomes) {
        let outcomes: Outcomes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&outcomes);
        let flow = PasscodeConfirmationFlow::new(RecordingSurface::default(), move |outcome| {
            sink.borrow_mut().push(outcome)
        });
        (flow, outcomes)
    }

    fn lockout() -> (LockoutPolicy, ManualClock) {
        let clock = ManualClock::default();
        let policy = LockoutPolicy::with_clock(LockoutConfig::default(), Arc::new(clock.clone()));
        (policy, clock)
    }

    #[test]
    fn test_start_renders_prompts() {
        let (mut flow, _) = flow();
        let (lockout, _) = lockout();

        flow.start(&lockout);

        let surface = flow.surface();
        assert!(surface.contains(&Command::Enabled(Slot::First, true)));
        assert!(surface.contains(&Command::Title(Slot::First, FIRST_TITLE.into())));
        assert!(surface.contains(&Command::Title(Slot::Confirm, CONFIRM_TITLE.into())));
        assert_eq!(surface.last_focus(), Some(Slot::First));
        assert_eq!(flow.stage(), Some(Stage::First));
    }

    #[test]
    fn test_matching_entries_confirm() {
        let (mut flow, outcomes) = flow();
        let (lockout, _) = lockout();

        assert_eq!(flow.submit("1234", &lockout), Transition::Advanced);
        assert_eq!(flow.stage(), Some(Stage::Confirm));
        assert_eq!(flow.first_entry(), Some("1234"));
        assert_eq!(flow.surface().last_focus(), Some(Slot::Confirm));

        assert_eq!(flow.submit("1234", &lockout), Transition::Completed);
        assert_eq!(flow.state(), FlowState::Confirmed);
        assert!(flow.surface().contains(&Command::Dismiss));
        assert_eq!(*outcomes.borrow(), vec![Some("1234".to_string())]);
    }

    #[test]
    fn test_mismatch_restarts_at_first_stage() {
        let (mut flow, outcomes) = flow();
        let (lockout, _) = lockout();

        flow.submit("1234", &lockout);
        assert_eq!(flow.submit("5678", &lockout), Transition::Mismatch);

        assert_eq!(flow.stage(), Some(Stage::First));
        assert_eq!(flow.first_entry(), None);
        let surface = flow.surface();
        assert!(surface.contains(&Command::ClearEntry(Slot::First)));
        assert!(surface.contains(&Command::Message(Slot::First, MISMATCH_MESSAGE.into())));
        assert_eq!(surface.last_focus(), Some(Slot::First));
        assert!(outcomes.borrow().is_empty());

        // Flow is still usable after a mismatch
        flow.submit("1234", &lockout);
        assert_eq!(flow.submit("1234", &lockout), Transition::Completed);
        assert_eq!(*outcomes.borrow(), vec![Some("1234".to_string())]);
    }

    #[test]
    fn test_mismatch_does_not_count_as_failure() {
        let (mut flow, _) = flow();
        let (lockout, _) = lockout();

        for _ in 0..10 {
            flow.submit("1111", &lockout);
            flow.submit("2222", &lockout);
        }
        assert_eq!(lockout.failure_count(), 0);
        assert!(!lockout.is_frozen());
    }

    #[test]
    fn test_cancel_at_first_stage() {
        let (mut flow, outcomes) = flow();
        let (lockout, _) = lockout();

        assert_eq!(flow.cancel(), Transition::Cancelled);
        assert_eq!(flow.state(), FlowState::Cancelled);
        assert_eq!(*outcomes.borrow(), vec![None]);

        assert_eq!(flow.submit("1234", &lockout), Transition::Ignored);
        assert_eq!(flow.cancel(), Transition::Ignored);
        assert_eq!(flow.state(), FlowState::Cancelled);
        assert_eq!(outcomes.borrow().len(), 1);
    }

    #[test]
    fn test_cancel_at_confirm_stage() {
        let (mut flow, outcomes) = flow();
        let (lockout, _) = lockout();

        flow.submit("1234", &lockout);
        assert_eq!(flow.cancel(), Transition::Cancelled);
        assert_eq!(flow.first_entry(), None);

        assert_eq!(flow.submit("1234", &lockout), Transition::Ignored);
        assert_eq!(*outcomes.borrow(), vec![None]);
    }

    #[test]
    fn test_confirmed_flow_ignores_further_events() {
        let (mut flow, outcomes) = flow();
        let (lockout, _) = lockout();

        flow.submit("1234", &lockout);
        flow.submit("1234", &lockout);
        flow.surface_mut().clear();

        assert_eq!(flow.submit("9999", &lockout), Transition::Ignored);
        assert_eq!(flow.cancel(), Transition::Ignored);
        flow.refresh_display(&lockout);

        assert_eq!(flow.state(), FlowState::Confirmed);
        assert!(flow.surface().commands.is_empty());
        assert_eq!(outcomes.borrow().len(), 1);
    }

    #[test]
    fn test_frozen_lockout_disables_input() {
        let (mut flow, _) = flow();
        let (mut lockout, _) = lockout();
        for _ in 0..6 {
            lockout.increment_failure();
        }
        lockout.apply_freeze();

        flow.start(&lockout);

        let surface = flow.surface();
        assert!(surface.contains(&Command::Enabled(Slot::First, false)));
        assert!(surface.contains(&Command::Title(
            Slot::First,
            "Try again in 5 minutes".into()
        )));
        assert!(surface.contains(&Command::Error(
            Slot::First,
            "6 Failed Passcode Attempts".into()
        )));
        assert!(!surface.contains(&Command::Title(Slot::First, FIRST_TITLE.into())));
        assert_eq!(flow.stage(), Some(Stage::First));
    }

    #[test]
    fn test_submit_while_frozen_is_ignored() {
        let (mut flow, _) = flow();
        let (mut lockout, clock) = lockout();
        lockout.apply_freeze();

        assert_eq!(flow.submit("1234", &lockout), Transition::Ignored);
        assert_eq!(flow.stage(), Some(Stage::First));
        assert_eq!(flow.first_entry(), None);

        clock.advance(chrono::Duration::seconds(60));
        assert_eq!(flow.submit("1234", &lockout), Transition::Advanced);
    }

    #[test]
    fn test_refresh_reenables_after_freeze_elapses() {
        let (mut flow, _) = flow();
        let (mut lockout, clock) = lockout();
        lockout.apply_freeze();
        flow.start(&lockout);

        clock.advance(chrono::Duration::minutes(2));
        flow.surface_mut().clear();
        flow.refresh_display(&lockout);

        let surface = flow.surface();
        assert!(surface.contains(&Command::Enabled(Slot::First, true)));
        assert!(surface.contains(&Command::Error(Slot::First, String::new())));
        assert!(surface.contains(&Command::Title(Slot::First, FIRST_TITLE.into())));
    }
}
