//! Loyalty points ledger
//!
//! Signed-point entries, append-only. A client's balance is the sum of
//! their rows; rows are never updated or deleted. Redemption at checkout
//! appends a negative row, settlement appends positive ones.

mod service;


pub use service::LoyaltyLedger;

use uuid::Uuid;

use crate::implementation::clients::ClientId;
use crate::implementation::now;

/// Loyalty program configuration, passed explicitly to the services that
/// need it rather than read from ambient global state.
#[derive(Debug, Clone)]
pub struct LoyaltySettings {
    /// Points credited to the referrer when a referred order is delivered.
    pub referral_reward_points:   i64,
    /// Fixed discount in dinars a valid referral code grants.
    pub referral_discount_amount: u64,
    /// Dinars per point, used for both redemption and earning.
    pub points_conversion_rate:   u64,
}

impl Default for LoyaltySettings {
    fn default() -> Self {
        Self {
            referral_reward_points:   100,
            referral_discount_amount: 500,
            points_conversion_rate:   10,
        }
    }
}

/// Append-only ledger row.
#[derive(Debug, Clone)]
pub struct LoyaltyEntry {
    /// Entry ID.
    pub id:          String,
    /// Credited or debited client.
    pub client_id:   ClientId,
    /// Signed points: positive credit, negative debit.
    pub points:      i64,
    /// What the movement was for.
    pub description: String,
    /// Timestamp.
    pub created_at:  u64,
}

impl LoyaltyEntry {
    /// Creates a new ledger row.
    #[must_use]
    pub fn new(client_id: ClientId, points: i64, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_id,
            points,
            description: description.into(),
            created_at: now(),
        }
    }
}

/// Balance of a client within a slice of ledger rows.
#[must_use]
pub(crate) fn balance_in(entries: &[LoyaltyEntry], client_id: &ClientId) -> i64 {
    entries.iter().filter(|e| &e.client_id == client_id).map(|e| e.points).sum()
}
