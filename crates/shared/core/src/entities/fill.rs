use serde::{Deserialize, Serialize};

use super::{OrderId, Side};
use crate::instruments::InstrumentId;
use crate::values::{Price, Quantity, Timestamp};

/// One atomic execution against an order
///
/// Append-only history: fills are never mutated after being recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    /// Order that was filled
    pub order_id: OrderId,
    /// The instrument that was traded
    pub instrument_id: InstrumentId,
    /// Quantity filled (always positive)
    pub quantity: Quantity,
    pub price: Price,
    pub side: Side,
    pub timestamp: Timestamp,
}

impl Fill {
    /// Get the symbol/instrument identifier as a string slice
    pub fn symbol(&self) -> &str {
        self.instrument_id.as_str()
    }

    /// Returns the notional value of the fill (price * quantity)
    pub fn notional(&self) -> Price {
        self.price * self.quantity
    }

    /// Quantity with the side's sign applied (buys positive)
    pub fn signed_quantity(&self) -> Quantity {
        self.side.signed(self.quantity)
    }
}
