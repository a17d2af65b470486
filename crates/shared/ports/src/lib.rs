//! Meridian Ports
//!
//! Port definitions (traits) for the Meridian order lifecycle.
//! These define the boundaries between order management and the brokers
//! and time sources it talks to.

mod broker;
mod clock;

pub use broker::BrokerAdapter;
pub use clock::Clock;
