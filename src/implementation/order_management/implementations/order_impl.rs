//! Order implementation.
//!
//! Business logic implementations for the Order type.

use crate::implementation::now;
use crate::implementation::stock::SettlementLine;

use super::super::types::basic_types::OrderStatus;
use super::super::types::main_order_types::Order;
use super::super::types::order_types::StatusChange;

impl Order {
    /// Amount due on delivery. Discounts can never push the total below
    /// zero.
    #[must_use]
    pub fn total_for(products_total: u64, delivery_price: u64, discount_total: u64) -> u64 {
        (products_total + delivery_price).saturating_sub(discount_total)
    }

    /// Applies a status transition and appends the history row.
    ///
    /// Reachability has already been checked by the service; this is the
    /// single status write.
    pub(crate) fn record_transition(&mut self, to: OrderStatus) {
        let from = self.status;
        self.status = to;
        self.touch();
        self.history.push(StatusChange { from, to, changed_at: self.updated_at });
    }

    /// The variant quantities settlement finalizes for this order.
    #[must_use]
    pub(crate) fn settlement_lines(&self) -> Vec<SettlementLine> {
        self.items
            .iter()
            .map(|item| SettlementLine {
                product_id: item.product_id.clone(),
                quantity:   item.quantity,
                choices:    item.metadata_snapshot.specifications.clone(),
            })
            .collect()
    }

    /// Updates the timestamp.
    fn touch(&mut self) {
        self.updated_at = now();
    }
}
