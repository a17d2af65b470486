use serde::{Deserialize, Serialize};

/// Order lifecycle status
///
/// ```text
/// New ──► Submitted ──┬──► PartiallyFilled ──┬──► Filled
///                     │        ▲    │        └──► Canceled
///                     │        └────┘
///                     ├──► Filled
///                     ├──► Canceled
///                     └──► Rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order has been created but not yet sent to a broker
    New,
    /// Order has been accepted by the broker, nothing filled yet
    Submitted,
    /// Order has been partially filled
    PartiallyFilled,
    /// Order has been completely filled
    Filled,
    /// Order has been canceled by the user
    Canceled,
    /// Order was rejected by the broker (or never existed there)
    Rejected,
}

impl OrderStatus {
    /// Returns true if the order is in a terminal state
    pub fn is_terminal(&self) -> bool {
        match self {
            OrderStatus::Filled | OrderStatus::Canceled | OrderStatus::Rejected => true,
            OrderStatus::New | OrderStatus::Submitted | OrderStatus::PartiallyFilled => false,
        }
    }

    /// Returns true if the order can still receive fills
    pub fn is_open(&self) -> bool {
        match self {
            OrderStatus::Submitted | OrderStatus::PartiallyFilled => true,
            OrderStatus::New
            | OrderStatus::Filled
            | OrderStatus::Canceled
            | OrderStatus::Rejected => false,
        }
    }

    /// Whether moving from `self` to `next` is a legal lifecycle step
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        match self {
            OrderStatus::New => matches!(next, OrderStatus::Submitted | OrderStatus::Rejected),
            OrderStatus::Submitted => matches!(
                next,
                OrderStatus::PartiallyFilled
                    | OrderStatus::Filled
                    | OrderStatus::Canceled
                    | OrderStatus::Rejected
            ),
            OrderStatus::PartiallyFilled => matches!(
                next,
                OrderStatus::PartiallyFilled | OrderStatus::Filled | OrderStatus::Canceled
            ),
            OrderStatus::Filled | OrderStatus::Canceled | OrderStatus::Rejected => false,
        }
    }

    /// Wire name, as written to the order log
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Submitted => "submitted",
            OrderStatus::PartiallyFilled => "partially_filled",
            OrderStatus::Filled => "filled",
            OrderStatus::Canceled => "canceled",
            OrderStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
