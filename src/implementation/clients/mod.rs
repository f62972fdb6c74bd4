//! Client directory
//!
//! Client records back the referral program: every client carries a
//! unique referral code, an optional back-reference to whoever referred
//! them, and an order count from which first-order-only referral
//! eligibility is derived.

mod service;

#[cfg(test)]
mod tests;

pub use service::ClientDirectory;

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Unique client identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(pub Cow<'static, str>);

impl ClientId {
    /// Creates a new client ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    /// Creates a client ID from a static string slice (zero-copy).
    #[must_use]
    pub fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client record.
#[derive(Debug, Clone)]
pub struct Client {
    /// Client ID.
    pub id:            ClientId,
    /// Unique referral code other clients can present at checkout.
    pub referral_code: String,
    /// Client who referred this one, set when their referral order lands.
    pub referrer_id:   Option<ClientId>,
    /// Contact phone.
    pub phone:         Option<String>,
    /// Orders placed so far, counted at creation time.
    pub order_count:   u32,
    /// Registration timestamp.
    pub created_at:    u64,
}

impl Client {
    /// Whether this client may still redeem a referral code.
    /// Referral discounts are first-order-only.
    #[must_use]
    pub fn is_referral_eligible(&self) -> bool {
        self.order_count == 0
    }
}
