//! Small-capital live trading guardrails
//!
//! Paper-first sizing rules applied between a portfolio's target weights and
//! the order manager:
//!
//! ```text
//! weights ──► compute_target_shares ──► enforce_turnover_budget ──► OMS
//!               - per-order notional cap     - scale all deltas when
//!               - min-notional filter          gross turnover exceeds
//!               - zero price → zero shares     the daily budget
//! ```

use log::{info, warn};
use meridian_core::{ExecutionReport, InstrumentId, PositionMap, Price};
use meridian_order_manager::OrderManager;
use meridian_ports::BrokerAdapter;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ConfigError;

/// Instrument -> portfolio weight (fraction of equity, signed)
pub type WeightMap = BTreeMap<InstrumentId, Decimal>;

/// Instrument -> last price
pub type PriceMap = BTreeMap<InstrumentId, Price>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveTradingConfig {
    /// Equity used when the caller does not pass one
    pub starting_equity: Decimal,
    /// Cap on |target notional| per instrument
    pub max_notional_per_order: Decimal,
    /// Daily gross turnover budget as a fraction of equity
    pub max_daily_turnover_ratio: Decimal,
    /// Targets worth less than this are dropped to zero
    pub min_order_notional: Decimal,
}

impl LiveTradingConfig {
    /// Reject values the sizing rules cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("live.starting_equity", self.starting_equity),
            ("live.max_notional_per_order", self.max_notional_per_order),
            ("live.max_daily_turnover_ratio", self.max_daily_turnover_ratio),
            ("live.min_order_notional", self.min_order_notional),
        ];
        for (field, value) in fields {
            if value < Decimal::ZERO {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("must not be negative, got {}", value),
                });
            }
        }
        Ok(())
    }
}

impl Default for LiveTradingConfig {
    fn default() -> Self {
        Self {
            starting_equity: dec!(10000),
            max_notional_per_order: dec!(500),
            max_daily_turnover_ratio: dec!(0.25),
            min_order_notional: dec!(25),
        }
    }
}

/// Outcome of one [`Guardrails::rebalance`]
#[derive(Debug, Clone)]
pub struct Rebalance {
    /// Share targets after the turnover budget
    pub targets: PositionMap,
    pub reports: Vec<ExecutionReport>,
}

#[derive(Debug, Clone, Default)]
pub struct Guardrails {
    config: LiveTradingConfig,
}

impl Guardrails {
    pub fn new(config: LiveTradingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LiveTradingConfig {
        &self.config
    }

    /// Convert weights to share targets over the price universe
    ///
    /// Weights without a price are ignored, priced instruments without a
    /// weight target zero.
    pub fn compute_target_shares(
        &self,
        weights: &WeightMap,
        prices: &PriceMap,
        equity: Option<Decimal>,
    ) -> PositionMap {
        let equity = equity.unwrap_or(self.config.starting_equity);
        // A negative cap would invert the clamp bounds
        let cap = self.config.max_notional_per_order.max(Decimal::ZERO);

        prices
            .iter()
            .map(|(instrument_id, price)| {
                let weight = weights.get(instrument_id).copied().unwrap_or_default();
                let notional = (weight * equity).clamp(-cap, cap);

                let mut shares = if *price > Decimal::ZERO {
                    notional / *price
                } else {
                    Decimal::ZERO
                };
                if shares.abs() * *price < self.config.min_order_notional {
                    shares = Decimal::ZERO;
                }
                (instrument_id.clone(), shares)
            })
            .collect()
    }

    /// Scale every delta down when the gross turnover exceeds the daily budget
    ///
    /// Works over the target's universe; missing current positions and
    /// prices count as zero.
    pub fn enforce_turnover_budget(
        &self,
        current: &PositionMap,
        target: &PositionMap,
        prices: &PriceMap,
        equity: Decimal,
    ) -> PositionMap {
        let deltas: Vec<(&InstrumentId, Decimal, Decimal)> = target
            .iter()
            .map(|(instrument_id, target_qty)| {
                let held = current.get(instrument_id).copied().unwrap_or_default();
                (instrument_id, held, *target_qty - held)
            })
            .collect();

        let gross_turnover: Decimal = deltas
            .iter()
            .map(|(instrument_id, _, delta)| {
                delta.abs() * prices.get(*instrument_id).copied().unwrap_or_default()
            })
            .sum();
        let budget = equity * self.config.max_daily_turnover_ratio;

        if gross_turnover <= budget || gross_turnover <= Decimal::ZERO {
            return target.clone();
        }

        let scale = budget / gross_turnover;
        warn!(
            "Turnover {} exceeds budget {}, scaling deltas by {}",
            gross_turnover, budget, scale
        );
        deltas
            .into_iter()
            .map(|(instrument_id, held, delta)| (instrument_id.clone(), held + delta * scale))
            .collect()
    }

    /// Weights to orders: size, budget, diff against the book, submit
    pub fn rebalance<B: BrokerAdapter + ?Sized>(
        &self,
        oms: &mut OrderManager<B>,
        weights: &WeightMap,
        prices: &PriceMap,
        equity: Option<Decimal>,
    ) -> Rebalance {
        let equity = equity.unwrap_or(self.config.starting_equity);
        let target_shares = self.compute_target_shares(weights, prices, Some(equity));
        let current = oms.positions().reindex(target_shares.keys());
        let targets = self.enforce_turnover_budget(&current, &target_shares, prices, equity);

        let orders = oms.generate_orders_from_target(&targets);
        info!(
            "Rebalance: {} instruments, {} orders, equity {}",
            targets.len(),
            orders.len(),
            equity
        );
        let reports = oms.submit_orders(orders);

        Rebalance { targets, reports }
    }
}
