//! Meridian Reconciliation
//!
//! Compares internal state against a broker's view:
//! - **Positions**: internal position book vs broker positions, per instrument
//! - **Fills**: internal fill journal vs broker fill report, per (instrument, side)
//!
//! Both comparisons are pure. Schema problems in broker-supplied fill data are
//! caught when the [`FillTable`] is built, never during comparison.

pub mod engine;
pub mod error;
pub mod table;

pub use engine::{
    DEFAULT_TOLERANCE, FillBreak, PositionBreak, ReconciliationSummary, reconcile_fills,
    reconcile_positions,
};
pub use error::{ReconError, Result};
pub use table::{FillRecord, FillTable};
