//! Meridian Core Domain
//!
//! Pure domain types for the Meridian order lifecycle.
//! This crate contains no I/O and no locking, and is 100% unit testable.

pub mod entities;
pub mod error;
pub mod instruments;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    ExecutionReport, Fill, MSG_DUPLICATE_CLIENT_ORDER_ID, MSG_MISSING_LIMIT_PRICE,
    MSG_ORDER_NOT_FOUND, Order, OrderId, OrderStatus, OrderType, Side,
};
pub use error::{OrderError, Result};
pub use instruments::InstrumentId;
pub use values::{PositionMap, Price, Quantity, Timestamp};
