use serde::{Deserialize, Serialize};

use super::{OrderType, Side};
use crate::error::{OrderError, Result};
use crate::instruments::InstrumentId;
use crate::values::{Price, Quantity};

/// Identifier under which a broker tracks an order
pub type OrderId = String;

/// Order request
///
/// Immutable once constructed. Quantity is unsigned; direction is carried by `side`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    instrument_id: InstrumentId,
    quantity: Quantity,
    side: Side,
    order_type: OrderType,
    /// Only meaningful for Limit orders
    limit_price: Option<Price>,
    /// Idempotency key for broker-side identity
    client_order_id: Option<String>,
}

impl Order {
    /// Create an order without validating it
    ///
    /// A limit order built without a limit price is accepted here; brokers
    /// reject it when they first try to match it.
    pub fn new(
        instrument_id: impl Into<InstrumentId>,
        side: Side,
        order_type: OrderType,
        quantity: Quantity,
        limit_price: Option<Price>,
    ) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            quantity,
            side,
            order_type,
            limit_price,
            client_order_id: None,
        }
    }

    /// Market order
    pub fn market(instrument_id: impl Into<InstrumentId>, side: Side, quantity: Quantity) -> Self {
        Self::new(instrument_id, side, OrderType::Market, quantity, None)
    }

    /// Limit order
    pub fn limit(
        instrument_id: impl Into<InstrumentId>,
        side: Side,
        quantity: Quantity,
        limit_price: Price,
    ) -> Self {
        Self::new(
            instrument_id,
            side,
            OrderType::Limit,
            quantity,
            Some(limit_price),
        )
    }

    /// Attach a client-assigned identifier
    pub fn with_client_order_id(mut self, client_order_id: impl Into<String>) -> Self {
        self.client_order_id = Some(client_order_id.into());
        self
    }

    pub fn instrument_id(&self) -> &InstrumentId {
        &self.instrument_id
    }

    /// Get the symbol/instrument identifier as a string slice
    pub fn symbol(&self) -> &str {
        self.instrument_id.as_str()
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn limit_price(&self) -> Option<Price> {
        self.limit_price
    }

    pub fn client_order_id(&self) -> Option<&str> {
        self.client_order_id.as_deref()
    }

    /// Validate the order based on order type requirements
    pub fn validate(&self) -> Result<()> {
        if self.quantity < Quantity::ZERO {
            return Err(OrderError::NegativeQuantity(self.quantity));
        }
        match (self.order_type, self.limit_price) {
            (OrderType::Market, _) => Ok(()),
            (OrderType::Limit, None) => Err(OrderError::MissingLimitPrice),
            (OrderType::Limit, Some(px)) if px <= Price::ZERO => {
                Err(OrderError::InvalidLimitPrice(px))
            }
            (OrderType::Limit, Some(_)) => Ok(()),
        }
    }

    /// Whether a mark price allows this order to execute
    ///
    /// Buys cross when the mark is at or below the limit, sells when it is at
    /// or above. Returns `None` for a limit order that has no limit price.
    pub fn crosses(&self, mark_price: Price) -> Option<bool> {
        match self.order_type {
            OrderType::Market => Some(true),
            OrderType::Limit => {
                let limit = self.limit_price?;
                Some(match self.side {
                    Side::Buy => mark_price <= limit,
                    Side::Sell => mark_price >= limit,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_market_order_always_crosses() {
        let order = Order::market("AAPL", Side::Buy, dec!(10));
        assert_eq!(order.crosses(dec!(1_000_000)), Some(true));
        assert!(order.validate().is_ok());
    }

    #[test]
    fn test_limit_buy_crosses_at_or_below_limit() {
        let order = Order::limit("AAPL", Side::Buy, dec!(10), dec!(100));
        assert_eq!(order.crosses(dec!(100)), Some(true));
        assert_eq!(order.crosses(dec!(99.5)), Some(true));
        assert_eq!(order.crosses(dec!(100.01)), Some(false));
    }

    #[test]
    fn test_limit_sell_crosses_at_or_above_limit() {
        let order = Order::limit("AAPL", Side::Sell, dec!(10), dec!(100));
        assert_eq!(order.crosses(dec!(100)), Some(true));
        assert_eq!(order.crosses(dec!(101)), Some(true));
        assert_eq!(order.crosses(dec!(99.99)), Some(false));
    }

    #[test]
    fn test_limit_without_price_is_malformed() {
        let order = Order::new("AAPL", Side::Buy, OrderType::Limit, dec!(1), None);
        assert_eq!(order.crosses(dec!(100)), None);
        assert_eq!(order.validate(), Err(OrderError::MissingLimitPrice));
    }

    #[test]
    fn test_validate_rejects_negative_quantity_and_bad_limit() {
        let negative = Order::market("AAPL", Side::Buy, dec!(-1));
        assert_eq!(
            negative.validate(),
            Err(OrderError::NegativeQuantity(dec!(-1)))
        );

        let zero_limit = Order::limit("AAPL", Side::Sell, dec!(1), dec!(0));
        assert_eq!(
            zero_limit.validate(),
            Err(OrderError::InvalidLimitPrice(dec!(0)))
        );
    }

    #[test]
    fn test_client_order_id() {
        let order = Order::market("AAPL", Side::Buy, dec!(1)).with_client_order_id("rebal-1");
        assert_eq!(order.client_order_id(), Some("rebal-1"));
        assert_eq!(order.symbol(), "AAPL");
    }
}
