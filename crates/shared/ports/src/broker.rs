use meridian_core::{ExecutionReport, Order};

/// Port for order routing
///
/// Different implementations talk to different venues:
/// - Paper trading against supplied mark prices
/// - Live brokers (not provided)
///
/// Methods take `&self`; implementations serialize their own state so one
/// adapter can be shared between the order manager and a market-data driver.
///
/// Business outcomes are reported as data. An unknown order id yields a
/// `Rejected` report with message `order_not_found`, never an error.
pub trait BrokerAdapter: Send + Sync {
    /// Register an order and acknowledge it with zero filled quantity
    ///
    /// A caller-supplied `client_order_id` is the order's identity at the
    /// broker. Submitting the same key twice must not create two tracking
    /// entries for one logical order.
    fn submit_order(&self, order: Order) -> ExecutionReport;

    /// Request cancellation
    ///
    /// Terminal orders are returned unchanged.
    fn cancel_order(&self, order_id: &str) -> ExecutionReport;

    /// Current state of an order, without side effects
    fn get_order(&self, order_id: &str) -> ExecutionReport;

    /// Adapter name for logs
    fn name(&self) -> &str {
        "BrokerAdapter"
    }
}
