//! Latchkey Core - passcode confirmation and progressive lockout
//!
//! This crate holds the decision logic behind local passcode protection:
//!
//! - [`LockoutPolicy`] tracks failed attempts and decides whether passcode
//!   entry is currently frozen, and for how long.
//! - [`PasscodeConfirmationFlow`] drives the "enter, then re-enter" interaction
//!   used when a new passcode is created.
//! - [`PasscodeUnlockFlow`] verifies a passcode against the one held in memory
//!   and feeds failures into the lockout policy.
//!
//! Rendering is left to the host application, which implements
//! [`PasscodeSurface`] and forwards submit/cancel events to the flows.

pub mod clock;
pub mod confirmation;
pub mod error;
pub mod lockout;
pub mod surface;
pub mod unlock;

pub use clock::{Clock, ManualClock, SystemClock};
pub use confirmation::{FlowState, PasscodeConfirmationFlow, Stage};
pub use error::{ConfigError, Result};
pub use lockout::{FreezeState, LockoutConfig, LockoutPolicy, MAX_FREEZE_SECS};
pub use surface::{PasscodeSurface, Slot};
pub use unlock::{PasscodeUnlockFlow, UnlockState};

/// Result of feeding one event into a flow
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// First entry captured, now waiting for confirmation
    Advanced,
    /// Entries did not match, flow is back at the first slot
    Mismatch,
    /// Entered passcode was rejected by the unlock flow
    Rejected {
        /// Whether this failure reached the lockout threshold
        threshold_reached: bool,
    },
    /// Flow finished with a confirmed or verified passcode
    Completed,
    /// Flow was cancelled by the user
    Cancelled,
    /// Event was dropped (flow already finished, or entry is frozen)
    Ignored,
}
