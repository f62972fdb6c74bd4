//! # Order Management Types - Basic Types
//!
//! Core identifiers and the order status state machine.

use serde::{Deserialize, Serialize};

// ============================================================================
// BASIC IDENTIFIERS
// ============================================================================

/// Unique order identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl OrderId {
    /// Creates a new order ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a new unique order ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("ORD-{}", uuid::Uuid::new_v4()))
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// STATUS STATE MACHINE
// ============================================================================

/// Order status.
///
/// The fulfilment chain is ordered: PENDING → PROCESSING → CONFIRMED →
/// SHIPPED → DELIVERED. CANCELLED is reachable from the first three
/// states only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order placed, not yet picked up by staff.
    #[default]
    Pending,
    /// Staff is preparing the order.
    Processing,
    /// Confirmed with the customer.
    Confirmed,
    /// Handed to the carrier.
    Shipped,
    /// Delivered. Terminal; entering it fires settlement.
    Delivered,
    /// Cancelled before shipping. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Position in the fulfilment chain. Cancelled sits outside it.
    fn chain_rank(self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Processing => Some(1),
            Self::Confirmed => Some(2),
            Self::Shipped => Some(3),
            Self::Delivered => Some(4),
            Self::Cancelled => None,
        }
    }

    /// Whether `target` is reachable from this status. Forward jumps
    /// along the chain are allowed, backward moves are not.
    #[must_use]
    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match target {
            Self::Cancelled => self.is_cancellable(),
            _ => match (self.chain_rank(), target.chain_rank()) {
                (Some(from), Some(to)) => to > from,
                _ => false,
            },
        }
    }

    /// Whether the order can still be cancelled.
    #[must_use]
    pub fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Processing | Self::Confirmed)
    }

    /// Whether this is a final state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Confirmed => "Confirmed",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
