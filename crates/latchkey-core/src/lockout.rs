//! Progressive lockout policy for failed passcode attempts
//!
//! Failures accumulate until [`LockoutPolicy::clear_state`] is called. The
//! caller decides when a failure warrants a freeze; the policy decides how
//! long that freeze lasts:
//!
//! - up to `max_failures` failures: `first_freeze_secs`
//! - beyond `max_failures` failures: `second_freeze_secs`
//!
//! A freeze is only ever extended. Applying a shorter freeze while a longer
//! one is in effect leaves the end time untouched.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::error::{ConfigError, Result};

/// Longest freeze a config may ask for (one year)
pub const MAX_FREEZE_SECS: u64 = 365 * 24 * 60 * 60;

/// Tunables for the lockout policy
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockoutConfig {
    /// Failure count at which the caller is told to freeze; the longer
    /// freeze applies once failures go beyond it
    pub max_failures: u32,
    /// Freeze length while failures are at or below `max_failures` (seconds)
    pub first_freeze_secs: u64,
    /// Freeze length once failures exceed `max_failures` (seconds)
    pub second_freeze_secs: u64,
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            max_failures: 5,
            first_freeze_secs: 60,   // 1 minute
            second_freeze_secs: 300, // 5 minutes
        }
    }
}

impl LockoutConfig {
    /// Create a strict policy (fewer attempts, longer freezes)
    pub fn strict() -> Self {
        Self {
            max_failures: 3,
            first_freeze_secs: 300,   // 5 minutes
            second_freeze_secs: 3600, // 1 hour
        }
    }

    /// Create a lenient policy (more attempts, short freezes)
    pub fn lenient() -> Self {
        Self {
            max_failures: 10,
            first_freeze_secs: 30,
            second_freeze_secs: 120,
        }
    }

    /// Check the tunables for values the policy cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.max_failures == 0 {
            return Err(ConfigError::ZeroMaxFailures);
        }
        if self.first_freeze_secs == 0 || self.second_freeze_secs == 0 {
            return Err(ConfigError::ZeroFreezeDuration);
        }
        let longest = self.first_freeze_secs.max(self.second_freeze_secs);
        if longest > MAX_FREEZE_SECS {
            return Err(ConfigError::FreezeTooLong {
                secs: longest,
                max: MAX_FREEZE_SECS,
            });
        }
        if self.second_freeze_secs < self.first_freeze_secs {
            return Err(ConfigError::FreezeOrder {
                first: self.first_freeze_secs,
                second: self.second_freeze_secs,
            });
        }
        Ok(())
    }

    /// Freeze length for the given failure count
    ///
    /// Unvalidated configs are clamped to [`MAX_FREEZE_SECS`].
    pub fn freeze_duration(&self, failure_count: u32) -> Duration {
        let secs = if failure_count > self.max_failures {
            self.second_freeze_secs
        } else {
            self.first_freeze_secs
        };
        Duration::seconds(secs.min(MAX_FREEZE_SECS) as i64)
    }
}

/// End of the current freeze, if one was ever applied
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FreezeState {
    /// Never frozen since the last reset
    #[default]
    Unset,
    /// Entry is blocked until this instant
    At(DateTime<Utc>),
}

impl FreezeState {
    /// The freeze end time, if set
    pub fn until(&self) -> Option<DateTime<Utc>> {
        match self {
            FreezeState::Unset => None,
            FreezeState::At(until) => Some(*until),
        }
    }
}

/// Failure counter and freeze window for one user session
#[derive(Debug)]
pub struct LockoutPolicy {
    config: LockoutConfig,
    clock: Arc<dyn Clock>,
    frozen_until: FreezeState,
    failure_count: u32,
}

impl LockoutPolicy {
    /// Create a policy driven by the system clock
    pub fn new(config: LockoutConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a policy with an injected clock
    pub fn with_clock(config: LockoutConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            frozen_until: FreezeState::Unset,
            failure_count: 0,
        }
    }

    /// Forget all failures and lift any freeze
    pub fn clear_state(&mut self) {
        tracing::debug!(failures = self.failure_count, "Clearing lockout state");
        self.frozen_until = FreezeState::Unset;
        self.failure_count = 0;
    }

    /// Freeze passcode entry, extending (never shortening) any current freeze
    pub fn apply_freeze(&mut self) {
        let duration = self.config.freeze_duration(self.failure_count);
        let candidate = self
            .clock
            .now()
            .checked_add_signed(duration)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        match self.frozen_until {
            FreezeState::At(current) if current >= candidate => {
                tracing::debug!(until = %current, "Existing freeze outlasts new one, keeping it");
            }
            _ => {
                tracing::info!(
                    failures = self.failure_count,
                    seconds = duration.num_seconds(),
                    until = %candidate,
                    "Passcode entry frozen"
                );
                self.frozen_until = FreezeState::At(candidate);
            }
        }
    }

    /// Whether passcode entry is currently blocked
    pub fn is_frozen(&self) -> bool {
        match self.frozen_until {
            FreezeState::Unset => false,
            FreezeState::At(until) => self.clock.now() < until,
        }
    }

    /// Time left on the freeze; zero or negative once it has elapsed
    pub fn remaining(&self) -> Duration {
        match self.frozen_until {
            FreezeState::Unset => Duration::zero(),
            FreezeState::At(until) => until - self.clock.now(),
        }
    }

    /// Minutes until entry is allowed again, rounded up
    ///
    /// Only meaningful while [`is_frozen`](Self::is_frozen) is true. Returns
    /// zero when no freeze was applied and a non-positive value once the
    /// freeze has elapsed.
    pub fn minutes_until_unfrozen(&self) -> i64 {
        let remaining = self.remaining();
        let whole = remaining.num_minutes();
        // Any leftover fraction of a minute, down to the nanosecond, rounds up
        if remaining > Duration::minutes(whole) {
            whole + 1
        } else {
            whole
        }
    }

    /// Record a failed attempt
    ///
    /// Returns true when the failure count has reached `max_failures`. No
    /// freeze is applied here; callers follow up with
    /// [`apply_freeze`](Self::apply_freeze) when they want one.
    pub fn increment_failure(&mut self) -> bool {
        self.failure_count = self.failure_count.saturating_add(1);
        let reached = self.failure_count >= self.config.max_failures;

        if reached {
            tracing::warn!(
                failures = self.failure_count,
                max = self.config.max_failures,
                "Passcode failure threshold reached"
            );
        } else {
            tracing::debug!(failures = self.failure_count, "Passcode failure recorded");
        }

        reached
    }

    /// Failures since the last reset
    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    /// End of the current freeze
    pub fn frozen_until(&self) -> FreezeState {
        self.frozen_until
    }

    /// Active tunables
    pub fn config(&self) -> &LockoutConfig {
        &self.config
    }

    /// Failure count line shown while frozen
    pub fn describe_failures(&self) -> String {
        format!("{} Failed Passcode Attempts", self.failure_count)
    }

    /// Human-readable countdown, e.g. "Try again in 3 minutes"
    pub fn describe_lockout(&self) -> String {
        let minutes = self.minutes_until_unfrozen();
        format!(
            "Try again in {} minute{}",
            minutes,
            if minutes > 1 { "s" } else { "" }
        )
    }
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self::new(LockoutConfig::default())
    }
}
