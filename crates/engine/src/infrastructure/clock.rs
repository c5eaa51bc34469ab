//! Clock implementations.

use chrono::{DateTime, SubsecRound, Utc};

use crate::infrastructure::ports::ClockPort;

/// Stored timestamps keep microseconds, so the clock never hands out more.
const SUBSEC_DIGITS: u16 = 6;

/// Wall clock truncated to microsecond precision. A record stamped with it
/// loads back from SQLite equal to the value that was written.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(SUBSEC_DIGITS)
    }
}

/// Always reports the same instant.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn system_clock_has_no_sub_microsecond_digits() {
        let now = SystemClock::new().now();
        assert_eq!(now.nanosecond() % 1_000, 0);
    }
}
