//! Wall-clock access
//!
//! Task ids and reminder comparisons both read "now" through [`Clock`] so
//! that tests can pin time instead of racing it.

use chrono::{DateTime, Local};

/// Source of the current local time
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// The real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
