use serde::{Deserialize, Serialize};

use super::{OrderId, OrderStatus};
use crate::values::{Price, Quantity};

/// Message on reports for an order id the broker does not know
pub const MSG_ORDER_NOT_FOUND: &str = "order_not_found";
/// Message on reports for a limit order submitted without a limit price
pub const MSG_MISSING_LIMIT_PRICE: &str = "missing_limit_price";
/// Message on reports for a client order id that is already tracked
pub const MSG_DUPLICATE_CLIENT_ORDER_ID: &str = "duplicate_client_order_id";

/// Broker view of an order at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub order_id: OrderId,
    pub status: OrderStatus,
    /// Cumulative filled quantity, never decreases for a given order
    pub filled_qty: Quantity,
    /// None while nothing has been filled
    pub avg_fill_price: Option<Price>,
    /// Set on rejection
    #[serde(default)]
    pub message: String,
}

impl ExecutionReport {
    /// Fresh acknowledgement with nothing filled
    pub fn submitted(order_id: impl Into<OrderId>) -> Self {
        Self {
            order_id: order_id.into(),
            status: OrderStatus::Submitted,
            filled_qty: Quantity::ZERO,
            avg_fill_price: None,
            message: String::new(),
        }
    }

    /// Rejection with nothing filled
    pub fn rejected(order_id: impl Into<OrderId>, reason: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            status: OrderStatus::Rejected,
            filled_qty: Quantity::ZERO,
            avg_fill_price: None,
            message: reason.into(),
        }
    }

    /// Query-failure signal for an unknown order id
    pub fn not_found(order_id: impl Into<OrderId>) -> Self {
        Self::rejected(order_id, MSG_ORDER_NOT_FOUND)
    }

    /// True when the broker never knew this order (as opposed to rejecting it)
    pub fn is_not_found(&self) -> bool {
        self.status == OrderStatus::Rejected && self.message == MSG_ORDER_NOT_FOUND
    }
}
