//! Audit trail
//!
//! Two append-only records kept by the order manager:
//! - [`OrderLog`]: every submission and every status observation, consumed by
//!   monitoring (reject ratios, order counts)
//! - [`AppliedFill`]: every fill increment that reached the position book,
//!   the internal side of fill reconciliation
//!
//! Neither is read back by order management logic.

use meridian_core::{InstrumentId, Order, OrderId, OrderStatus, Quantity, Side, Timestamp};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Order handed to the broker
    Submit,
    /// Broker status observed during sync or cancel
    Status,
}

/// One order log row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderEvent {
    pub ts: Timestamp,
    pub event: EventKind,
    pub order_id: OrderId,
    pub instrument_id: InstrumentId,
    pub quantity: Quantity,
    pub side: Side,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct OrderLog {
    events: Vec<OrderEvent>,
}

impl OrderLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        ts: Timestamp,
        event: EventKind,
        order_id: &str,
        order: &Order,
        status: OrderStatus,
    ) {
        self.events.push(OrderEvent {
            ts,
            event,
            order_id: order_id.to_string(),
            instrument_id: order.instrument_id().clone(),
            quantity: order.quantity(),
            side: order.side(),
            status,
        });
    }

    pub fn events(&self) -> &[OrderEvent] {
        &self.events
    }

    /// Number of rows carrying `status`
    pub fn status_count(&self, status: OrderStatus) -> usize {
        self.events.iter().filter(|e| e.status == status).count()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// A fill increment applied to the position book
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedFill {
    pub order_id: OrderId,
    pub instrument_id: InstrumentId,
    pub side: Side,
    pub quantity: Quantity,
    pub applied_at: Timestamp,
}
