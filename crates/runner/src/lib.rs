//! Meridian Runner - Paper Sessions and Live Guardrails
//!
//! Wires the execution components into a runnable session:
//!
//! - **Config**: JSON runner configuration with defaults for every section
//! - **Guardrails**: Small-capital sizing and turnover limits
//! - **Session**: One targets → fills → reconciliation cycle on a paper broker
//!
//! ## Architecture
//!
//! ```text
//!   weights + prices ──► Guardrails ──┐
//!                                     ▼
//!   targets ─────────────────────► Order Manager ──► Paper Broker ◄── marks
//!                                     │                   │
//!                                     │ position book     │ fill history
//!                                     ▼                   ▼
//!                                ┌─────────────────────────────┐
//!                                │       Reconciliation        │
//!                                └─────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod guardrails;
pub mod session;

pub use config::{ReconciliationConfig, RunnerConfig};
pub use error::{ConfigError, Result, RunnerError};
pub use guardrails::{Guardrails, LiveTradingConfig, PriceMap, Rebalance, WeightMap};
pub use session::{PaperSession, SessionInput, SessionReport};
