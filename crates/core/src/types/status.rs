//! Order status enum.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
///
/// Transitions are one-directional: `Completed -> Returned` is the only
/// allowed transition. `Pending` is initial, `Returned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Returned,
}

impl OrderStatus {
    /// Whether a return is allowed from this status.
    ///
    /// Only completed orders can be returned; this check is the sole
    /// safeguard against a double stock increment.
    #[must_use]
    pub const fn can_return(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Completed => write!(f, "Completed"),
            Self::Returned => write!(f, "Returned"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Completed" => Ok(Self::Completed),
            "Returned" => Ok(Self::Returned),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}
