//! Position and fill reconciliation
//!
//! Pure comparisons of what we think we hold or traded against what the
//! broker says. Nothing is corrected here; breaks are reported as rows for
//! an operator or a monitor to act on.

use log::{info, warn};
use meridian_core::{InstrumentId, PositionMap, Quantity, Side};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::table::FillTable;

/// Break threshold when the caller has no opinion (1e-8)
pub const DEFAULT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 8);

/// One instrument's position comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionBreak {
    pub instrument_id: InstrumentId,
    pub internal_qty: Quantity,
    pub broker_qty: Quantity,
    /// `internal_qty - broker_qty`
    pub diff_qty: Quantity,
    pub is_break: bool,
}

/// One (instrument, side) fill total comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FillBreak {
    pub instrument_id: InstrumentId,
    pub side: Side,
    pub internal_qty: Quantity,
    pub broker_qty: Quantity,
    pub diff_qty: Quantity,
    pub is_break: bool,
}

/// Compare position maps over the union of their instruments
///
/// An instrument absent from one side counts as flat there. Returns one row
/// per instrument, sorted, breaking or not.
pub fn reconcile_positions(
    internal: &PositionMap,
    broker: &PositionMap,
    tolerance: Decimal,
) -> Vec<PositionBreak> {
    let universe: BTreeSet<&InstrumentId> = internal.keys().chain(broker.keys()).collect();

    let rows: Vec<PositionBreak> = universe
        .into_iter()
        .map(|instrument_id| {
            let internal_qty = internal.get(instrument_id).copied().unwrap_or_default();
            let broker_qty = broker.get(instrument_id).copied().unwrap_or_default();
            let diff_qty = internal_qty - broker_qty;
            PositionBreak {
                instrument_id: instrument_id.clone(),
                internal_qty,
                broker_qty,
                diff_qty,
                is_break: diff_qty.abs() > tolerance,
            }
        })
        .collect();

    for row in rows.iter().filter(|r| r.is_break) {
        warn!(
            "Position break: {} internal={} broker={} diff={}",
            row.instrument_id, row.internal_qty, row.broker_qty, row.diff_qty
        );
    }
    rows
}

/// Compare fill totals grouped by (instrument, side)
///
/// Full outer join of the two aggregates; a group missing on one side
/// counts as zero there. Rows are sorted by instrument then side.
pub fn reconcile_fills(
    internal: &FillTable,
    broker: &FillTable,
    tolerance: Decimal,
) -> Vec<FillBreak> {
    let internal_totals = internal.aggregate();
    let broker_totals = broker.aggregate();
    let keys: BTreeSet<&(InstrumentId, Side)> =
        internal_totals.keys().chain(broker_totals.keys()).collect();

    let rows: Vec<FillBreak> = keys
        .into_iter()
        .map(|key| {
            let internal_qty = internal_totals.get(key).copied().unwrap_or_default();
            let broker_qty = broker_totals.get(key).copied().unwrap_or_default();
            let diff_qty = internal_qty - broker_qty;
            FillBreak {
                instrument_id: key.0.clone(),
                side: key.1,
                internal_qty,
                broker_qty,
                diff_qty,
                is_break: diff_qty.abs() > tolerance,
            }
        })
        .collect();

    for row in rows.iter().filter(|r| r.is_break) {
        warn!(
            "Fill break: {} {} internal={} broker={} diff={}",
            row.instrument_id, row.side, row.internal_qty, row.broker_qty, row.diff_qty
        );
    }
    rows
}

/// Break counts over a position report and a fill report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationSummary {
    pub instruments_checked: usize,
    pub position_breaks: usize,
    pub fill_groups_checked: usize,
    pub fill_breaks: usize,
}

impl ReconciliationSummary {
    pub fn new(positions: &[PositionBreak], fills: &[FillBreak]) -> Self {
        let summary = Self {
            instruments_checked: positions.len(),
            position_breaks: positions.iter().filter(|r| r.is_break).count(),
            fill_groups_checked: fills.len(),
            fill_breaks: fills.iter().filter(|r| r.is_break).count(),
        };
        info!(
            "Reconciliation: {}/{} position breaks, {}/{} fill breaks",
            summary.position_breaks,
            summary.instruments_checked,
            summary.fill_breaks,
            summary.fill_groups_checked
        );
        summary
    }

    pub fn break_count(&self) -> usize {
        self.position_breaks + self.fill_breaks
    }

    pub fn has_breaks(&self) -> bool {
        self.break_count() > 0
    }
}
