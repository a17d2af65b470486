//! Paper session
//!
//! Runs one end-to-end cycle against a fresh paper broker:
//!
//! 1. Targets (given directly, or sized from weights by the guardrails)
//! 2. Orders generated and submitted through the order manager
//! 3. Mark prices replayed into the broker
//! 4. Sync books the fills
//! 5. Positions and fills reconciled against the broker's view

use log::info;
use meridian_core::{ExecutionReport, PositionMap};
use meridian_order_manager::OrderManager;
use meridian_paper_broker::{MarkPrice, PaperBroker};
use meridian_reconciliation::{
    FillBreak, FillRecord, FillTable, PositionBreak, ReconciliationSummary, reconcile_fills,
    reconcile_positions,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use crate::config::RunnerConfig;
use crate::error::{ConfigError, Result, RunnerError};
use crate::guardrails::{Guardrails, PriceMap, WeightMap};

/// Session input file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionInput {
    /// Share targets, used when no weights are given
    #[serde(default)]
    pub targets: PositionMap,

    /// Portfolio weights, sized through the guardrails against `prices`
    #[serde(default)]
    pub weights: WeightMap,

    #[serde(default)]
    pub prices: PriceMap,

    /// Overrides the configured starting equity
    #[serde(default)]
    pub equity: Option<Decimal>,

    /// Mark prices replayed in order after submission
    #[serde(default)]
    pub marks: Vec<MarkPrice>,

    /// External fill report rows; the broker's own fill history when absent
    #[serde(default)]
    pub broker_fills: Option<Value>,
}

impl SessionInput {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RunnerError::Session(e.to_string()))
    }
}

/// Everything a session produced, serializable for export
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub targets: PositionMap,
    pub submissions: Vec<ExecutionReport>,
    pub updates: Vec<ExecutionReport>,
    pub positions: PositionMap,
    pub broker_positions: PositionMap,
    pub position_breaks: Vec<PositionBreak>,
    pub fill_breaks: Vec<FillBreak>,
    pub summary: ReconciliationSummary,
}

pub struct PaperSession {
    config: RunnerConfig,
    broker: Arc<PaperBroker>,
    oms: OrderManager<PaperBroker>,
}

impl PaperSession {
    pub fn new(config: RunnerConfig) -> Self {
        let broker = Arc::new(PaperBroker::new());
        let oms = OrderManager::new(Arc::clone(&broker));
        Self {
            config,
            broker,
            oms,
        }
    }

    pub fn broker(&self) -> &Arc<PaperBroker> {
        &self.broker
    }

    pub fn oms(&self) -> &OrderManager<PaperBroker> {
        &self.oms
    }

    pub fn run(&mut self, input: &SessionInput) -> Result<SessionReport> {
        // Validate external data before trading anything
        let broker_fills = input
            .broker_fills
            .as_ref()
            .map(|rows| FillTable::from_json_rows("broker_fills", rows))
            .transpose()?;

        let (targets, submissions) = if input.weights.is_empty() {
            let orders = self.oms.generate_orders_from_target(&input.targets);
            (input.targets.clone(), self.oms.submit_orders(orders))
        } else {
            if input.prices.is_empty() {
                return Err(RunnerError::Session(
                    "weights given without prices".to_string(),
                ));
            }
            let outcome = Guardrails::new(self.config.live.clone()).rebalance(
                &mut self.oms,
                &input.weights,
                &input.prices,
                input.equity,
            );
            (outcome.targets, outcome.reports)
        };
        info!("Submitted {} orders", submissions.len());

        for mark in &input.marks {
            self.broker.process_market_data(mark);
        }
        let updates = self.oms.sync();

        let positions = self.oms.snapshot();
        let broker_positions = self.broker.positions();
        let position_breaks = reconcile_positions(
            &positions,
            &broker_positions,
            self.config.reconciliation.position_tolerance,
        );

        let internal_fills: FillTable = self
            .oms
            .applied_fills()
            .iter()
            .map(|f| FillRecord::new(f.instrument_id.clone(), f.side, f.quantity))
            .collect();
        let broker_fills = match broker_fills {
            Some(table) => table,
            None => self.broker.fills().iter().map(FillRecord::from).collect(),
        };
        let fill_breaks = reconcile_fills(
            &internal_fills,
            &broker_fills,
            self.config.reconciliation.fill_tolerance,
        );

        let summary = ReconciliationSummary::new(&position_breaks, &fill_breaks);

        Ok(SessionReport {
            targets,
            submissions,
            updates,
            positions,
            broker_positions,
            position_breaks,
            fill_breaks,
            summary,
        })
    }
}
