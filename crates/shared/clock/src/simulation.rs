use chrono::Duration;
use meridian_core::Timestamp;
use meridian_ports::Clock;
use parking_lot::RwLock;
use std::sync::Arc;

/// Controllable clock for replays and tests
///
/// Time is frozen at the value it was created with and only moves through
/// [`advance`](Self::advance) or [`set_time`](Self::set_time). Clones share
/// the same underlying time, so a driver can move the clock that a broker
/// and an order manager both read.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    current: Arc<RwLock<Timestamp>>,
}

impl SimulationClock {
    /// Create a clock frozen at `time`
    pub fn at(time: Timestamp) -> Self {
        Self {
            current: Arc::new(RwLock::new(time)),
        }
    }

    /// Move time forward (or backward for a negative duration)
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.write();
        *current += duration;
    }

    /// Jump to an explicit time
    ///
    /// Warning: This can cause time discontinuities. Use with caution.
    pub fn set_time(&self, time: Timestamp) {
        *self.current.write() = time;
    }
}

impl Clock for SimulationClock {
    fn now(&self) -> Timestamp {
        *self.current.read()
    }

    fn name(&self) -> &str {
        "SimulationClock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn open() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 1, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_time_is_frozen_until_advanced() {
        let clock = SimulationClock::at(open());
        assert_eq!(clock.now(), open());
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(clock.now(), open());

        clock.advance(Duration::seconds(5));
        assert_eq!(clock.now() - open(), Duration::seconds(5));
    }

    #[test]
    fn test_clones_share_time() {
        let clock = SimulationClock::at(open());
        let view = clock.clone();
        clock.set_time(open() + Duration::hours(6));
        assert_eq!(view.now(), open() + Duration::hours(6));
    }
}
