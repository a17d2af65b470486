use indexmap::IndexMap;
use log::{debug, info, warn};
use meridian_clock::SystemClock;
use meridian_core::{
    ExecutionReport, Fill, MSG_DUPLICATE_CLIENT_ORDER_ID, MSG_MISSING_LIMIT_PRICE, Order, OrderId,
    OrderStatus, PositionMap, Quantity,
};
use meridian_ports::{BrokerAdapter, Clock};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::model::{MarkPrice, OpenOrderState};

/// Everything guarded by the broker lock
#[derive(Debug, Default)]
struct BrokerState {
    /// Keyed by order id, in submission order
    orders: IndexMap<OrderId, OpenOrderState>,
    /// Append-only
    fills: Vec<Fill>,
    /// Bumped for every generated id
    seq: u64,
}

impl BrokerState {
    /// Next `paper-{seq:08}` id not already taken by a client-supplied id
    fn next_order_id(&mut self) -> OrderId {
        loop {
            self.seq += 1;
            let order_id = format!("paper-{:08}", self.seq);
            if !self.orders.contains_key(&order_id) {
                return order_id;
            }
        }
    }
}

/// Paper broker with deterministic fill logic
///
/// All state sits behind one mutex: submissions, cancels and mark-price
/// matching are serialized, and a single mark is matched against one
/// consistent view of the open orders.
pub struct PaperBroker {
    state: Mutex<BrokerState>,
    clock: Arc<dyn Clock>,
}

impl PaperBroker {
    /// Create a paper broker that stamps fills with wall-clock time
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()))
    }

    /// Create a paper broker reading time from `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(BrokerState::default()),
            clock,
        }
    }

    /// Attempt fills against an incoming mark price
    ///
    /// Returns a report for every order the mark changed, in the order the
    /// orders were submitted.
    pub fn process_market_data(&self, mark: &MarkPrice) -> Vec<ExecutionReport> {
        let timestamp = mark.timestamp.unwrap_or_else(|| self.clock.now());
        let mut updates = Vec::new();

        let mut guard = self.state.lock();
        let BrokerState { orders, fills, .. } = &mut *guard;

        for (order_id, entry) in orders.iter_mut() {
            if !entry.status.is_open() || entry.order.instrument_id() != &mark.instrument_id {
                continue;
            }

            match entry.order.crosses(mark.price) {
                None => {
                    if entry.transition(OrderStatus::Rejected) {
                        entry.message = MSG_MISSING_LIMIT_PRICE.to_string();
                        warn!("Order rejected: {} - limit order without limit price", order_id);
                        updates.push(entry.report(order_id));
                    }
                    continue;
                }
                Some(false) => continue,
                Some(true) => {}
            }

            // Whole remaining quantity in one step at the mark
            let fill_qty = entry.remaining_qty.max(Quantity::ZERO);
            if !entry.apply_fill(fill_qty, mark.price) {
                warn!(
                    "Skipping fill for {}: illegal transition from {}",
                    order_id, entry.status
                );
                continue;
            }

            if fill_qty > Quantity::ZERO {
                fills.push(Fill {
                    order_id: order_id.clone(),
                    instrument_id: entry.order.instrument_id().clone(),
                    quantity: fill_qty,
                    price: mark.price,
                    side: entry.order.side(),
                    timestamp,
                });
            }

            info!(
                "Paper fill: id={}, symbol={}, side={}, qty={}, price={}, status={}",
                order_id,
                entry.order.symbol(),
                entry.order.side(),
                fill_qty,
                mark.price,
                entry.status
            );
            updates.push(entry.report(order_id));
        }

        updates
    }

    /// Copy of the fill history, oldest first
    pub fn fills(&self) -> Vec<Fill> {
        self.state.lock().fills.clone()
    }

    /// Net position per instrument implied by the fill history
    ///
    /// This is the broker's own view of holdings, independent of any order
    /// manager's book, and is what internal positions reconcile against.
    pub fn positions(&self) -> PositionMap {
        let state = self.state.lock();
        let mut positions = PositionMap::new();
        for fill in &state.fills {
            *positions.entry(fill.instrument_id.clone()).or_default() += fill.signed_quantity();
        }
        positions
    }

    /// Ids of orders that can still fill, in submission order
    pub fn open_order_ids(&self) -> Vec<OrderId> {
        self.state
            .lock()
            .orders
            .iter()
            .filter(|(_, entry)| entry.status.is_open())
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Number of orders ever accepted
    pub fn order_count(&self) -> usize {
        self.state.lock().orders.len()
    }
}

impl Default for PaperBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl BrokerAdapter for PaperBroker {
    fn submit_order(&self, order: Order) -> ExecutionReport {
        let mut state = self.state.lock();

        let order_id = match order.client_order_id() {
            Some(client_id) => {
                if state.orders.contains_key(client_id) {
                    warn!("Order rejected: {} - duplicate client order id", client_id);
                    return ExecutionReport::rejected(client_id, MSG_DUPLICATE_CLIENT_ORDER_ID);
                }
                client_id.to_string()
            }
            None => state.next_order_id(),
        };

        debug!(
            "Order accepted: id={}, symbol={}, side={}, type={:?}, qty={}",
            order_id,
            order.symbol(),
            order.side(),
            order.order_type(),
            order.quantity()
        );
        let entry = OpenOrderState::new(order);
        let report = entry.report(&order_id);
        state.orders.insert(order_id, entry);
        report
    }

    fn cancel_order(&self, order_id: &str) -> ExecutionReport {
        let mut state = self.state.lock();
        let Some(entry) = state.orders.get_mut(order_id) else {
            return ExecutionReport::not_found(order_id);
        };

        if entry.transition(OrderStatus::Canceled) {
            info!(
                "Order canceled: id={}, filled={}, remaining={}",
                order_id, entry.filled_qty, entry.remaining_qty
            );
        } else {
            debug!("Cancel ignored for {}: already {}", order_id, entry.status);
        }
        entry.report(order_id)
    }

    fn get_order(&self, order_id: &str) -> ExecutionReport {
        let state = self.state.lock();
        match state.orders.get(order_id) {
            Some(entry) => entry.report(order_id),
            None => ExecutionReport::not_found(order_id),
        }
    }

    fn name(&self) -> &str {
        "paper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::{OrderType, Side, MSG_ORDER_NOT_FOUND};
    use rust_decimal_macros::dec;

    #[test]
    fn test_submit_assigns_sequence_ids() {
        let broker = PaperBroker::new();
        let a = broker.submit_order(Order::market("AAPL", Side::Buy, dec!(1)));
        let b = broker.submit_order(Order::market("MSFT", Side::Buy, dec!(1)));

        assert_eq!(a.order_id, "paper-00000001");
        assert_eq!(b.order_id, "paper-00000002");
        assert_eq!(a.status, OrderStatus::Submitted);
        assert!(a.filled_qty.is_zero());
        assert_eq!(a.avg_fill_price, None);
    }

    #[test]
    fn test_client_order_id_is_used_as_identity() {
        let broker = PaperBroker::new();
        let report = broker
            .submit_order(Order::market("AAPL", Side::Buy, dec!(1)).with_client_order_id("c-1"));
        assert_eq!(report.order_id, "c-1");
        assert_eq!(broker.get_order("c-1").status, OrderStatus::Submitted);
    }

    #[test]
    fn test_duplicate_client_order_id_is_rejected() {
        let broker = PaperBroker::new();
        broker.submit_order(Order::market("AAPL", Side::Buy, dec!(10)).with_client_order_id("c-1"));
        let dup = broker
            .submit_order(Order::market("AAPL", Side::Sell, dec!(3)).with_client_order_id("c-1"));

        assert_eq!(dup.status, OrderStatus::Rejected);
        assert_eq!(dup.message, MSG_DUPLICATE_CLIENT_ORDER_ID);
        assert_eq!(broker.order_count(), 1);

        // The original keeps its full remaining quantity
        broker.process_market_data(&MarkPrice::new("AAPL", dec!(100)));
        let original = broker.get_order("c-1");
        assert_eq!(original.status, OrderStatus::Filled);
        assert_eq!(original.filled_qty, dec!(10));
    }

    #[test]
    fn test_generated_id_skips_client_id_of_same_shape() {
        let broker = PaperBroker::new();
        let client = broker.submit_order(
            Order::market("AAPL", Side::Buy, dec!(1)).with_client_order_id("paper-00000001"),
        );
        let generated = broker.submit_order(Order::market("MSFT", Side::Buy, dec!(1)));

        assert_eq!(client.status, OrderStatus::Submitted);
        assert_eq!(generated.status, OrderStatus::Submitted);
        assert_eq!(generated.order_id, "paper-00000002");
        assert!(generated.message.is_empty());
        assert_eq!(broker.order_count(), 2);

        // Both orders fill independently
        broker.process_market_data(&MarkPrice::new("MSFT", dec!(50)));
        assert_eq!(broker.get_order("paper-00000002").status, OrderStatus::Filled);
        assert_eq!(broker.get_order("paper-00000001").status, OrderStatus::Submitted);
    }

    #[test]
    fn test_market_order_fills_at_mark() {
        let broker = PaperBroker::new();
        let id = broker
            .submit_order(Order::market("AAPL", Side::Buy, dec!(10)))
            .order_id;

        let updates = broker.process_market_data(&MarkPrice::new("AAPL", dec!(101.5)));
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].order_id, id);
        assert_eq!(updates[0].status, OrderStatus::Filled);
        assert_eq!(updates[0].filled_qty, dec!(10));
        assert_eq!(updates[0].avg_fill_price, Some(dec!(101.5)));

        let fills = broker.fills();
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].quantity, dec!(10));
        assert_eq!(fills[0].price, dec!(101.5));
    }

    #[test]
    fn test_mark_for_other_instrument_is_ignored() {
        let broker = PaperBroker::new();
        broker.submit_order(Order::market("AAPL", Side::Buy, dec!(10)));
        assert!(broker
            .process_market_data(&MarkPrice::new("MSFT", dec!(300)))
            .is_empty());
        assert!(broker.fills().is_empty());
    }

    #[test]
    fn test_limit_buy_waits_for_cross() {
        let broker = PaperBroker::new();
        let id = broker
            .submit_order(Order::limit("AAPL", Side::Buy, dec!(5), dec!(100)))
            .order_id;

        assert!(broker
            .process_market_data(&MarkPrice::new("AAPL", dec!(100.5)))
            .is_empty());
        assert_eq!(broker.get_order(&id).status, OrderStatus::Submitted);

        let updates = broker.process_market_data(&MarkPrice::new("AAPL", dec!(99)));
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].avg_fill_price, Some(dec!(99)));
    }

    #[test]
    fn test_limit_sell_waits_for_cross() {
        let broker = PaperBroker::new();
        let id = broker
            .submit_order(Order::limit("AAPL", Side::Sell, dec!(5), dec!(100)))
            .order_id;

        broker.process_market_data(&MarkPrice::new("AAPL", dec!(99.99)));
        assert_eq!(broker.get_order(&id).status, OrderStatus::Submitted);

        broker.process_market_data(&MarkPrice::new("AAPL", dec!(100)));
        assert_eq!(broker.get_order(&id).status, OrderStatus::Filled);
    }

    #[test]
    fn test_limit_without_price_rejected_on_first_match() {
        let broker = PaperBroker::new();
        let id = broker
            .submit_order(Order::new("AAPL", Side::Buy, OrderType::Limit, dec!(5), None))
            .order_id;
        assert_eq!(broker.get_order(&id).status, OrderStatus::Submitted);

        let updates = broker.process_market_data(&MarkPrice::new("AAPL", dec!(100)));
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].status, OrderStatus::Rejected);
        assert_eq!(updates[0].message, MSG_MISSING_LIMIT_PRICE);
        assert!(broker.fills().is_empty());

        // Terminal: later marks do not touch it
        assert!(broker
            .process_market_data(&MarkPrice::new("AAPL", dec!(100)))
            .is_empty());
    }

    #[test]
    fn test_filled_order_does_not_fill_twice() {
        let broker = PaperBroker::new();
        broker.submit_order(Order::market("AAPL", Side::Buy, dec!(10)));
        broker.process_market_data(&MarkPrice::new("AAPL", dec!(100)));
        let second = broker.process_market_data(&MarkPrice::new("AAPL", dec!(90)));

        assert!(second.is_empty());
        assert_eq!(broker.fills().len(), 1);
    }

    #[test]
    fn test_cancel_unknown_order() {
        let broker = PaperBroker::new();
        let report = broker.cancel_order("nope");
        assert_eq!(report.status, OrderStatus::Rejected);
        assert_eq!(report.message, MSG_ORDER_NOT_FOUND);

        let query = broker.get_order("nope");
        assert!(query.is_not_found());
    }

    #[test]
    fn test_cancel_open_then_terminal_is_noop() {
        let broker = PaperBroker::new();
        let id = broker
            .submit_order(Order::limit("AAPL", Side::Buy, dec!(5), dec!(90)))
            .order_id;

        let canceled = broker.cancel_order(&id);
        assert_eq!(canceled.status, OrderStatus::Canceled);

        // No fills after cancel, even if the mark crosses
        assert!(broker
            .process_market_data(&MarkPrice::new("AAPL", dec!(80)))
            .is_empty());

        let again = broker.cancel_order(&id);
        assert_eq!(again, canceled);
    }

    #[test]
    fn test_cancel_filled_order_returns_unchanged_report() {
        let broker = PaperBroker::new();
        let id = broker
            .submit_order(Order::market("AAPL", Side::Buy, dec!(3)))
            .order_id;
        broker.process_market_data(&MarkPrice::new("AAPL", dec!(10)));
        let filled = broker.get_order(&id);

        assert_eq!(broker.cancel_order(&id), filled);
    }

    #[test]
    fn test_cancel_rejected_order_stays_rejected() {
        let broker = PaperBroker::new();
        let id = broker
            .submit_order(Order::new("AAPL", Side::Sell, OrderType::Limit, dec!(1), None))
            .order_id;
        broker.process_market_data(&MarkPrice::new("AAPL", dec!(10)));

        let report = broker.cancel_order(&id);
        assert_eq!(report.status, OrderStatus::Rejected);
        assert_eq!(report.message, MSG_MISSING_LIMIT_PRICE);
    }

    #[test]
    fn test_positions_net_buys_and_sells() {
        let broker = PaperBroker::new();
        broker.submit_order(Order::market("AAPL", Side::Buy, dec!(10)));
        broker.submit_order(Order::market("AAPL", Side::Sell, dec!(4)));
        broker.submit_order(Order::market("MSFT", Side::Sell, dec!(2)));
        broker.process_market_data(&MarkPrice::new("AAPL", dec!(100)));
        broker.process_market_data(&MarkPrice::new("MSFT", dec!(300)));

        let positions = broker.positions();
        assert_eq!(positions.get("AAPL"), Some(&dec!(6)));
        assert_eq!(positions.get("MSFT"), Some(&dec!(-2)));
    }

    #[test]
    fn test_open_order_ids_in_submission_order() {
        let broker = PaperBroker::new();
        let a = broker
            .submit_order(Order::market("MSFT", Side::Buy, dec!(1)))
            .order_id;
        let b = broker
            .submit_order(Order::market("AAPL", Side::Buy, dec!(1)))
            .order_id;
        assert_eq!(broker.open_order_ids(), vec![a, b.clone()]);

        broker.process_market_data(&MarkPrice::new("MSFT", dec!(1)));
        assert_eq!(broker.open_order_ids(), vec![b]);
    }
}
