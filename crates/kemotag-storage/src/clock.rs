//! Time source for record timestamps

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock, millisecond precision to match what is persisted.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        from_millis(Utc::now().timestamp_millis())
    }
}

/// Deterministic clock that advances by a fixed step on every reading.
///
/// Useful wherever ordering by timestamp must not depend on how fast the
/// machine is, e.g. eviction and recency tests.
#[derive(Debug)]
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl SteppingClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }

    /// Starts at the epoch and ticks one millisecond per reading.
    pub fn from_epoch() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH, Duration::milliseconds(1))
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock();
        let now = *next;
        *next = now + self.step;
        now
    }
}

/// Converts persisted epoch milliseconds back into a timestamp.
pub fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stepping_clock_is_strictly_increasing() {
        let clock = SteppingClock::from_epoch();
        let first = clock.now();
        let second = clock.now();
        assert_eq!(first, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(second - first, Duration::milliseconds(1));
    }

    #[test]
    fn test_system_clock_round_trips_through_millis() {
        let now = SystemClock.now();
        assert_eq!(from_millis(now.timestamp_millis()), now);
    }
}
