use serde::{Deserialize, Serialize};

/// Order types supported by the broker adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Execute at current mark price
    Market,
    /// Execute at specified price or better
    Limit,
}
