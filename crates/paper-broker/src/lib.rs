//! Meridian Paper Broker
//!
//! A [`BrokerAdapter`](meridian_ports::BrokerAdapter) that simulates
//! deterministic fills against externally supplied mark prices:
//!
//! - **Market orders** fill in full on the first mark for their instrument
//! - **Limit orders** fill in full once the mark crosses the limit in the
//!   order's favour (buy: mark <= limit, sell: mark >= limit)
//! - **Malformed limit orders** (no limit price) are rejected on first match
//!
//! ## Flow
//!
//! ```text
//! OMS ──submit/cancel/get──► PaperBroker ◄──MarkPrice── market data driver
//!                                │
//!                                ├── open order state (insertion ordered)
//!                                └── fill history (append-only)
//! ```
//!
//! Matching walks open orders in submission order. There is no price/time
//! priority between orders: each order is checked against the mark on its
//! own, and at most one fill is produced per order per mark.

pub mod broker;
pub mod model;

pub use broker::PaperBroker;
pub use model::MarkPrice;
