//! Loyalty ledger service

use std::sync::{Arc, Mutex};

use crate::errors::CheckoutError;
use crate::implementation::clients::ClientId;

use super::{balance_in, LoyaltyEntry};

/// Append-only loyalty points ledger.
#[derive(Debug, Clone, Default)]
pub struct LoyaltyLedger {
    /// Ledger rows in insertion order.
    pub(crate) entries: Arc<Mutex<Vec<LoyaltyEntry>>>,
}

impl LoyaltyLedger {
    /// Creates a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a credit row.
    pub fn credit(
        &self, client_id: ClientId, points: i64, description: impl Into<String>,
    ) -> Result<LoyaltyEntry, CheckoutError> {
        let entry = LoyaltyEntry::new(client_id, points, description);
        let mut entries = self.entries.lock().map_err(|_| CheckoutError::Lock)?;
        entries.push(entry.clone());
        Ok(entry)
    }

    /// Current balance: the sum of the client's rows.
    pub fn balance(&self, client_id: &ClientId) -> Result<i64, CheckoutError> {
        let entries = self.entries.lock().map_err(|_| CheckoutError::Lock)?;
        Ok(balance_in(&entries, client_id))
    }

    /// The client's rows, most recent first.
    pub fn history(&self, client_id: &ClientId) -> Result<Vec<LoyaltyEntry>, CheckoutError> {
        let entries = self.entries.lock().map_err(|_| CheckoutError::Lock)?;
        let mut rows: Vec<_> =
            entries.iter().filter(|e| &e.client_id == client_id).cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}
