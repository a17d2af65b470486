//! Order Management System
//!
//! Turns target positions into orders, routes them through a
//! [`BrokerAdapter`], and keeps the position book in line with what the
//! broker reports as filled.
//!
//! Every unit of filled quantity reaches the book exactly once. The applied
//! ledger remembers, per order, the cumulative quantity already booked; a
//! sync only books `report.filled_qty - applied`, so re-reading an unchanged
//! report books nothing.

use indexmap::IndexMap;
use log::{debug, info, warn};
use meridian_clock::SystemClock;
use meridian_core::{
    ExecutionReport, Order, OrderId, OrderStatus, PositionMap, Quantity, Side,
};
use meridian_ports::{BrokerAdapter, Clock};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use crate::journal::{AppliedFill, EventKind, OrderLog};
use crate::position::PositionBook;

/// Deltas smaller than this are floating noise, not trades (1e-12)
pub const MIN_ORDER_DELTA: Decimal = Decimal::from_parts(1, 0, 0, false, 12);

/// Order manager over a single broker adapter
///
/// The broker is held behind an `Arc` so a market-data driver can keep its
/// own handle to the same adapter.
pub struct OrderManager<B: BrokerAdapter + ?Sized> {
    broker: Arc<B>,
    positions: PositionBook,
    order_log: OrderLog,
    /// Orders that can still fill, in submission order
    open_orders: IndexMap<OrderId, Order>,
    /// Cumulative filled quantity already booked, per order
    applied: HashMap<OrderId, Quantity>,
    applied_fills: Vec<AppliedFill>,
    clock: Arc<dyn Clock>,
}

impl<B: BrokerAdapter + ?Sized> OrderManager<B> {
    pub fn new(broker: Arc<B>) -> Self {
        Self::with_clock(broker, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(broker: Arc<B>, clock: Arc<dyn Clock>) -> Self {
        Self {
            broker,
            positions: PositionBook::new(),
            order_log: OrderLog::new(),
            open_orders: IndexMap::new(),
            applied: HashMap::new(),
            applied_fills: Vec::new(),
            clock,
        }
    }

    /// One market order per instrument whose target differs from the book
    ///
    /// The book is read over the target's instruments only; an instrument
    /// the book has never seen counts as flat. Deltas below
    /// [`MIN_ORDER_DELTA`] produce no order, so zero-quantity orders are never
    /// emitted. Orders come out in instrument order.
    pub fn generate_orders_from_target(&self, target: &PositionMap) -> Vec<Order> {
        let current = self.positions.reindex(target.keys());

        target
            .iter()
            .filter_map(|(instrument_id, target_qty)| {
                let held = current.get(instrument_id).copied().unwrap_or_default();
                let delta = *target_qty - held;
                if delta.abs() < MIN_ORDER_DELTA {
                    return None;
                }
                Some(Order::market(
                    instrument_id.clone(),
                    Side::from_delta(delta),
                    delta.abs(),
                ))
            })
            .collect()
    }

    /// Send orders to the broker, one log row per submission
    ///
    /// Accepted orders (`Submitted` / `PartiallyFilled`) are tracked for
    /// sync. Reports are returned in submission order.
    pub fn submit_orders(&mut self, orders: Vec<Order>) -> Vec<ExecutionReport> {
        let mut reports = Vec::with_capacity(orders.len());

        for order in orders {
            let report = self.broker.submit_order(order.clone());

            match report.status {
                OrderStatus::Submitted | OrderStatus::PartiallyFilled => {
                    self.applied
                        .entry(report.order_id.clone())
                        .or_insert(Quantity::ZERO);
                    self.open_orders
                        .insert(report.order_id.clone(), order.clone());
                    // An adapter may report fills on acknowledgement
                    self.book_increment(&order, &report);
                }
                OrderStatus::Filled | OrderStatus::Canceled => {
                    self.book_increment(&order, &report);
                }
                OrderStatus::Rejected => {
                    warn!(
                        "Order rejected on submit: {} {} {} - {}",
                        order.symbol(),
                        order.side(),
                        order.quantity(),
                        report.message
                    );
                }
                OrderStatus::New => {
                    warn!("Broker left order {} in state new", report.order_id);
                }
            }

            self.order_log.record(
                self.clock.now(),
                EventKind::Submit,
                &report.order_id,
                &order,
                report.status,
            );
            debug!(
                "Submitted {} {} {} via {} -> {} ({})",
                order.symbol(),
                order.side(),
                order.quantity(),
                self.broker.name(),
                report.order_id,
                report.status
            );
            reports.push(report);
        }

        reports
    }

    /// Pull the latest report for every tracked order and book new fills
    ///
    /// Orders that reached a terminal status stop being tracked, after their
    /// final increment has been booked.
    pub fn sync(&mut self) -> Vec<ExecutionReport> {
        let tracked: Vec<OrderId> = self.open_orders.keys().cloned().collect();
        let mut updates = Vec::with_capacity(tracked.len());

        for order_id in tracked {
            let Some(order) = self.open_orders.get(&order_id).cloned() else {
                continue;
            };
            let report = self.broker.get_order(&order_id);

            self.order_log.record(
                self.clock.now(),
                EventKind::Status,
                &order_id,
                &order,
                report.status,
            );
            self.book_increment(&order, &report);

            match report.status {
                OrderStatus::Filled | OrderStatus::Canceled | OrderStatus::Rejected => {
                    if report.is_not_found() {
                        warn!("Broker no longer knows order {}, dropping it", order_id);
                    }
                    self.open_orders.shift_remove(&order_id);
                }
                OrderStatus::New | OrderStatus::Submitted | OrderStatus::PartiallyFilled => {}
            }

            updates.push(report);
        }

        if !updates.is_empty() {
            info!(
                "Sync complete: {} reports, {} orders still open",
                updates.len(),
                self.open_orders.len()
            );
        }
        updates
    }

    /// Ask the broker to cancel an order
    ///
    /// Does not touch the book or the applied ledger; any final fill and the
    /// terminal status are picked up by the next [`sync`](Self::sync).
    pub fn cancel(&mut self, order_id: &str) -> ExecutionReport {
        let report = self.broker.cancel_order(order_id);
        match self.open_orders.get(order_id) {
            Some(order) => {
                self.order_log.record(
                    self.clock.now(),
                    EventKind::Status,
                    order_id,
                    order,
                    report.status,
                );
            }
            None => debug!("Cancel for untracked order {}: {}", order_id, report.status),
        }
        report
    }

    /// Book `report.filled_qty - applied`, if positive
    fn book_increment(&mut self, order: &Order, report: &ExecutionReport) {
        let applied = self
            .applied
            .entry(report.order_id.clone())
            .or_insert(Quantity::ZERO);
        let incremental = (report.filled_qty - *applied).max(Quantity::ZERO);
        if incremental.is_zero() {
            return;
        }

        let position = self
            .positions
            .apply_fill(order.instrument_id(), incremental, order.side());
        *applied = report.filled_qty;

        self.applied_fills.push(AppliedFill {
            order_id: report.order_id.clone(),
            instrument_id: order.instrument_id().clone(),
            side: order.side(),
            quantity: incremental,
            applied_at: self.clock.now(),
        });
        info!(
            "Booked fill: order={}, symbol={}, side={}, qty={}, position={}",
            report.order_id,
            order.symbol(),
            order.side(),
            incremental,
            position
        );
    }

    pub fn positions(&self) -> &PositionBook {
        &self.positions
    }

    /// Position book snapshot, sorted by instrument
    pub fn snapshot(&self) -> PositionMap {
        self.positions.snapshot()
    }

    pub fn order_log(&self) -> &OrderLog {
        &self.order_log
    }

    pub fn applied_fills(&self) -> &[AppliedFill] {
        &self.applied_fills
    }

    /// Quantity already booked for an order
    pub fn applied_qty(&self, order_id: &str) -> Option<Quantity> {
        self.applied.get(order_id).copied()
    }

    pub fn open_order_ids(&self) -> Vec<OrderId> {
        self.open_orders.keys().cloned().collect()
    }

    pub fn open_order_count(&self) -> usize {
        self.open_orders.len()
    }

    pub fn broker(&self) -> &Arc<B> {
        &self.broker
    }
}

/// Order manager behind a mutex, for drivers that call it from several threads
///
/// All book and ledger mutation happens under the one lock.
pub struct SharedOrderManager<B: BrokerAdapter + ?Sized> {
    inner: Arc<Mutex<OrderManager<B>>>,
}

impl<B: BrokerAdapter + ?Sized> SharedOrderManager<B> {
    pub fn new(manager: OrderManager<B>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    pub fn generate_orders_from_target(&self, target: &PositionMap) -> Vec<Order> {
        self.inner.lock().generate_orders_from_target(target)
    }

    pub fn submit_orders(&self, orders: Vec<Order>) -> Vec<ExecutionReport> {
        self.inner.lock().submit_orders(orders)
    }

    pub fn sync(&self) -> Vec<ExecutionReport> {
        self.inner.lock().sync()
    }

    pub fn cancel(&self, order_id: &str) -> ExecutionReport {
        self.inner.lock().cancel(order_id)
    }

    pub fn snapshot(&self) -> PositionMap {
        self.inner.lock().snapshot()
    }

    /// Run `f` with exclusive access to the manager
    pub fn with<R>(&self, f: impl FnOnce(&mut OrderManager<B>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl<B: BrokerAdapter + ?Sized> Clone for SharedOrderManager<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
