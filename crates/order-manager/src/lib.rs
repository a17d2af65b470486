//! Meridian Order Manager
//!
//! The Order Manager sits between whatever produces target positions and a
//! broker adapter, responsible for:
//! - **Order Generation**: Diffs target positions against the book
//! - **Submission**: Routes orders through a [`BrokerAdapter`](meridian_ports::BrokerAdapter)
//! - **Fill Sync**: Books newly filled quantity exactly once per unit
//! - **Audit**: Order log and applied-fill journal
//!
//! ## Architecture
//!
//! ```text
//! Targets ──► ┌────────────────────────────────────────┐
//!             │            Order Manager               │
//!             │  ┌─────────────────────────────────┐   │
//!             │  │   generate_orders_from_target   │   │
//!             │  │   - target minus book           │   │
//!             │  │   - one market order per delta  │   │
//!             │  └───────────────┬─────────────────┘   │
//!             │                  │ Orders              │
//!             │  ┌───────────────▼─────────────────┐   │
//!             │  │   submit_orders                 │   │
//!             │  │   - track accepted orders       │   │
//!             │  │   - order log                   │   │
//!             │  └───────────────┬─────────────────┘   │
//!             └──────────────────┼─────────────────────┘
//!                                ▼
//!                          Broker Adapter ◄── Mark prices
//!                                │
//!             sync() ◄───────────┘ Execution reports
//!               │
//!               ▼
//!         Applied ledger ──► Position Book ──► Reconciliation
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use meridian_order_manager::OrderManager;
//! use meridian_paper_broker::PaperBroker;
//!
//! let broker = Arc::new(PaperBroker::new());
//! let mut oms = OrderManager::new(Arc::clone(&broker));
//!
//! let orders = oms.generate_orders_from_target(&targets);
//! oms.submit_orders(orders);
//! broker.process_market_data(&MarkPrice::new("AAPL", dec!(190)));
//! oms.sync();
//! ```

pub mod journal;
pub mod manager;
pub mod position;

// Re-export main types
pub use journal::{AppliedFill, EventKind, OrderEvent, OrderLog};
pub use manager::{MIN_ORDER_DELTA, OrderManager, SharedOrderManager};
pub use position::PositionBook;
