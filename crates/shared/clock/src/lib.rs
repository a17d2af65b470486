//! Meridian Clock Infrastructure
//!
//! Time sources for fill timestamps and the order log:
//!
//! - [`SystemClock`]: wall-clock time for paper sessions
//! - [`SimulationClock`]: frozen time that only moves when told to, for
//!   deterministic tests and end-of-day replays
//!
//! ## Usage
//!
//! ```ignore
//! use meridian_clock::{Clock, SimulationClock};
//! use chrono::Duration;
//!
//! let clock = SimulationClock::at(session_open);
//! clock.advance(Duration::minutes(5));
//! assert_eq!(clock.now(), session_open + Duration::minutes(5));
//! ```

mod simulation;
mod system;

pub use simulation::SimulationClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use meridian_ports::Clock;
