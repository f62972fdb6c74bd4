//! # Order Management Types - Order Types
//!
//! Line items, purchase-time snapshots and status history rows.

use serde::{Deserialize, Serialize};

use crate::types::catalog::{ProductId, SpecificationChoice};

use super::basic_types::OrderStatus;

// ============================================================================
// ORDER LINE ITEM
// ============================================================================

/// Frozen copy of the mutable product data a line was purchased with.
/// Survives later edits or deletion of the product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    /// Product name at purchase time.
    pub product_name:   String,
    /// Chosen specification name/value pairs at purchase time.
    pub specifications: Vec<SpecificationChoice>,
}

/// Line item in an order.
#[derive(Debug, Clone)]
pub struct OrderItem {
    /// Product ID.
    pub product_id:        ProductId,
    /// Quantity ordered.
    pub quantity:          u64,
    /// Unit price at purchase time, in dinars. Never recomputed.
    pub price_snapshot:    u64,
    /// Frozen product metadata.
    pub metadata_snapshot: ItemSnapshot,
}

impl OrderItem {
    /// Line total.
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.price_snapshot * self.quantity
    }
}

// ============================================================================
// STATUS HISTORY
// ============================================================================

/// One status transition on an order.
#[derive(Debug, Clone)]
pub struct StatusChange {
    /// Status before.
    pub from:       OrderStatus,
    /// Status after.
    pub to:         OrderStatus,
    /// When the transition happened.
    pub changed_at: u64,
}
