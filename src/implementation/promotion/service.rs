//! Promo code service

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use tracing::debug;

use crate::errors::CheckoutError;

use super::{PromoCode, PromoGrant, PromoProbe};

/// Promo code store and resolver.
#[derive(Debug, Clone, Default)]
pub struct PromoCodeService {
    /// Codes indexed by normalized code string.
    pub(crate) codes: Arc<Mutex<HashMap<String, PromoCode>>>,
}

impl PromoCodeService {
    /// Creates a new promo code service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces a code.
    pub fn register(&self, code: PromoCode) -> Result<(), CheckoutError> {
        let mut codes = self.codes.lock().map_err(|_| CheckoutError::Lock)?;
        codes.insert(code.code.clone(), code);
        Ok(())
    }

    /// Enables or disables a code. Unknown codes are ignored: the admin
    /// surface never leaks whether a code exists.
    pub fn set_active(&self, code: &str, is_active: bool) -> Result<(), CheckoutError> {
        let mut codes = self.codes.lock().map_err(|_| CheckoutError::Lock)?;
        if let Some(promo) = codes.get_mut(&code.to_uppercase()) {
            promo.is_active = is_active;
        }
        Ok(())
    }

    /// Looks up a code without redeeming it.
    pub fn get(&self, code: &str) -> Result<Option<PromoCode>, CheckoutError> {
        let codes = self.codes.lock().map_err(|_| CheckoutError::Lock)?;
        Ok(codes.get(&code.to_uppercase()).cloned())
    }

    /// Resolves a code against a products subtotal without side effects.
    ///
    /// Unknown, inactive, expired and exhausted codes all come back as
    /// the same `DiscountRejected`.
    pub fn resolve(&self, code: &str, subtotal: u64) -> Result<PromoGrant, CheckoutError> {
        let codes = self.codes.lock().map_err(|_| CheckoutError::Lock)?;
        let promo = codes
            .get(&code.to_uppercase())
            .filter(|p| p.is_redeemable())
            .ok_or(CheckoutError::DiscountRejected)?;

        debug!(code = %promo.code, "promo code resolved");
        Ok(PromoGrant {
            code:          promo.code.clone(),
            amount:        promo.discount_for(subtotal),
            free_shipping: promo.is_free_shipping(),
        })
    }

    /// Pre-checkout probe used for UI feedback. Same resolution as
    /// checkout, never increments the use count.
    pub fn probe(&self, code: &str, amount: u64) -> Result<PromoProbe, CheckoutError> {
        let grant = self.resolve(code, amount)?;
        Ok(PromoProbe {
            discount:         grant.amount,
            is_free_shipping: grant.free_shipping,
            code:             grant.code,
        })
    }
}
