//! Promo code management and discount resolution
//!
//! Validates codes and computes discount amounts. Rejection is always
//! the same generic error so callers cannot distinguish unknown,
//! inactive, expired and exhausted codes.

mod service;


pub use service::PromoCodeService;

use serde::{Deserialize, Serialize};

use crate::implementation::now;

/// How a promo code discounts an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromoKind {
    /// Percentage of the products subtotal.
    Percent,
    /// Fixed amount off the products subtotal.
    Fixed,
    /// Delivery price forced to zero; no subtotal discount.
    FreeShipping,
}

/// Admin-managed promo code row.
#[derive(Debug, Clone)]
pub struct PromoCode {
    /// Code, stored uppercase.
    pub code:           String,
    /// Discount type.
    pub kind:           PromoKind,
    /// Percent or dinar value. Always 0 for free shipping.
    pub discount_value: u64,
    /// Maximum number of redemptions, `None` for unlimited.
    pub max_use:        Option<u32>,
    /// Redemptions so far.
    pub use_count:      u32,
    /// Expiry as epoch seconds, `None` for no expiry.
    pub expires_at:     Option<u64>,
    /// Whether the code can currently be redeemed.
    pub is_active:      bool,
}

impl PromoCode {
    /// Creates an active code. Free-shipping codes carry no value.
    #[must_use]
    pub fn new(code: impl Into<String>, kind: PromoKind, discount_value: u64) -> Self {
        let discount_value = match kind {
            PromoKind::FreeShipping => 0,
            _ => discount_value,
        };
        Self {
            code: code.into().to_uppercase(),
            kind,
            discount_value,
            max_use: None,
            use_count: 0,
            expires_at: None,
            is_active: true,
        }
    }

    /// Caps total redemptions.
    #[must_use]
    pub fn with_max_use(mut self, max_use: u32) -> Self {
        self.max_use = Some(max_use);
        self
    }

    /// Sets an expiry timestamp.
    #[must_use]
    pub fn with_expiry(mut self, expires_at: u64) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Whether the code can be redeemed right now.
    #[must_use]
    pub fn is_redeemable(&self) -> bool {
        if !self.is_active {
            return false;
        }
        if let Some(expires_at) = self.expires_at {
            if now() > expires_at {
                return false;
            }
        }
        match self.max_use {
            Some(max_use) => self.use_count < max_use,
            None => true,
        }
    }

    /// Discount amount against a products subtotal. Never exceeds the
    /// subtotal, so the order total cannot go negative.
    #[must_use]
    pub fn discount_for(&self, subtotal: u64) -> u64 {
        match self.kind {
            PromoKind::Percent => (subtotal * self.discount_value / 100).min(subtotal),
            PromoKind::Fixed => self.discount_value.min(subtotal),
            PromoKind::FreeShipping => 0,
        }
    }

    /// Whether this code zeroes the delivery price.
    #[must_use]
    pub fn is_free_shipping(&self) -> bool {
        self.kind == PromoKind::FreeShipping
    }
}

/// Outcome of resolving a promo code against a subtotal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoGrant {
    /// Normalized code.
    pub code:          String,
    /// Subtotal discount in dinars.
    pub amount:        u64,
    /// Whether delivery is free.
    pub free_shipping: bool,
}

/// Pre-checkout probe response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoProbe {
    /// Discount the code would grant against the probed amount.
    pub discount:         u64,
    /// Whether delivery would be free.
    pub is_free_shipping: bool,
    /// Normalized code.
    pub code:             String,
}
