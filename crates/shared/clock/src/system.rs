use chrono::Utc;
use meridian_core::Timestamp;
use meridian_ports::Clock;

/// Wall-clock time source
///
/// Default clock for the paper broker and the order manager: fill
/// timestamps and order log entries carry real time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}
