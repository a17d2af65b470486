use meridian_core::{
    ExecutionReport, InstrumentId, Order, OrderStatus, Price, Quantity, Timestamp,
};
use serde::{Deserialize, Serialize};

/// Mark price event driving paper fills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkPrice {
    pub instrument_id: InstrumentId,
    pub price: Price,
    /// Taken from the broker clock when absent
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
}

impl MarkPrice {
    pub fn new(instrument_id: impl Into<InstrumentId>, price: Price) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            price,
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Broker-side tracking state for one order
#[derive(Debug, Clone)]
pub(crate) struct OpenOrderState {
    pub order: Order,
    pub remaining_qty: Quantity,
    pub filled_qty: Quantity,
    /// Quantity-weighted price sum, for the average fill price
    pub filled_notional: Price,
    pub status: OrderStatus,
    pub message: String,
}

impl OpenOrderState {
    pub fn new(order: Order) -> Self {
        Self {
            remaining_qty: order.quantity(),
            order,
            filled_qty: Quantity::ZERO,
            filled_notional: Price::ZERO,
            status: OrderStatus::Submitted,
            message: String::new(),
        }
    }

    pub fn avg_fill_price(&self) -> Option<Price> {
        if self.filled_qty > Quantity::ZERO {
            Some(self.filled_notional / self.filled_qty)
        } else {
            None
        }
    }

    pub fn report(&self, order_id: &str) -> ExecutionReport {
        ExecutionReport {
            order_id: order_id.to_string(),
            status: self.status,
            filled_qty: self.filled_qty,
            avg_fill_price: self.avg_fill_price(),
            message: self.message.clone(),
        }
    }

    /// Move to `next` if the lifecycle allows it
    pub fn transition(&mut self, next: OrderStatus) -> bool {
        if self.status.can_transition_to(next) {
            self.status = next;
            true
        } else {
            false
        }
    }

    /// Execute `quantity` at `price`; returns false (and changes nothing)
    /// if the order can no longer take fills
    pub fn apply_fill(&mut self, quantity: Quantity, price: Price) -> bool {
        let remaining = self.remaining_qty - quantity;
        let next = if remaining > Quantity::ZERO {
            OrderStatus::PartiallyFilled
        } else {
            OrderStatus::Filled
        };
        if !self.transition(next) {
            return false;
        }
        self.remaining_qty = remaining;
        self.filled_qty += quantity;
        self.filled_notional += quantity * price;
        true
    }
}
