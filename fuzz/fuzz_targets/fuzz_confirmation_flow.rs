#![no_main]

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use arbitrary::Arbitrary;
use chrono::Duration;
use latchkey_core::{
    LockoutConfig, LockoutPolicy, ManualClock, PasscodeConfirmationFlow, PasscodeSurface, Slot,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug)]
struct NullSurface;

impl PasscodeSurface for NullSurface {
    fn set_enabled(&mut self, _: Slot, _: bool) {}
    fn set_title(&mut self, _: Slot, _: &str) {}
    fn set_message(&mut self, _: Slot, _: &str) {}
    fn set_error(&mut self, _: Slot, _: &str) {}
    fn clear_entry(&mut self, _: Slot) {}
    fn focus(&mut self, _: Slot) {}
    fn dismiss(&mut self) {}
}

#[derive(Arbitrary, Debug)]
enum Event {
    Submit(u16),
    Cancel,
    Fail,
    Freeze,
    Clear,
    Advance(u16),
    AdvanceNanos(u32),
}

#[derive(Arbitrary, Debug)]
struct Input {
    max_failures: u8,
    first_freeze_secs: u16,
    second_freeze_secs: u16,
    events: Vec<Event>,
}

fuzz_target!(|input: Input| {
    let config = LockoutConfig {
        max_failures: u32::from(input.max_failures),
        first_freeze_secs: u64::from(input.first_freeze_secs),
        second_freeze_secs: u64::from(input.second_freeze_secs),
    };
    let clock = ManualClock::default();
    let mut lockout = LockoutPolicy::with_clock(config, Arc::new(clock.clone()));

    let outcomes = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&outcomes);
    let mut flow = PasscodeConfirmationFlow::new(NullSurface, move |_| {
        counter.set(counter.get() + 1);
    });
    flow.start(&lockout);

    for event in input.events {
        let before = lockout.frozen_until().until();
        match &event {
            Event::Submit(code) => {
                let _ = flow.submit(&format!("{:04}", *code % 10_000), &lockout);
            }
            Event::Cancel => {
                let _ = flow.cancel();
            }
            Event::Fail => {
                if lockout.increment_failure() {
                    lockout.apply_freeze();
                }
            }
            Event::Freeze => lockout.apply_freeze(),
            Event::Clear => lockout.clear_state(),
            Event::Advance(secs) => clock.advance(Duration::seconds(i64::from(*secs))),
            Event::AdvanceNanos(nanos) => clock.advance(Duration::nanoseconds(i64::from(*nanos))),
        }

        // A freeze only moves forward unless explicitly cleared
        if !matches!(event, Event::Clear) {
            assert!(lockout.frozen_until().until() >= before);
        }
        assert_eq!(lockout.is_frozen(), lockout.minutes_until_unfrozen() > 0);
        assert!(outcomes.get() <= 1);
    }

    assert_eq!(outcomes.get(), u32::from(flow.is_finished()));
});
