//! Screen modules for different views

pub mod passcode;
pub mod unlocked;
