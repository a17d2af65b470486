use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::instruments::InstrumentId;

/// Price value - uses Decimal for precision
pub type Price = Decimal;

/// Quantity value - uses Decimal for precision
pub type Quantity = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Instrument -> signed quantity, iterated in instrument order.
///
/// Used for target vectors, position book snapshots and external position views.
pub type PositionMap = BTreeMap<InstrumentId, Quantity>;
