//! Referral validation service

use tracing::warn;

use crate::errors::CheckoutError;
use crate::implementation::clients::{ClientDirectory, ClientId};
use crate::implementation::order_management::OrderService;

use super::ReferralGrant;

/// Validates referral codes against the client directory and the
/// referrer's order history.
#[derive(Debug, Clone)]
pub struct ReferralValidator {
    clients: ClientDirectory,
    orders:  OrderService,
}

impl ReferralValidator {
    /// Creates a new validator.
    #[must_use]
    pub fn new(clients: ClientDirectory, orders: OrderService) -> Self {
        Self { clients, orders }
    }

    /// Resolves a code as a referral.
    ///
    /// Returns `Ok(None)` when the code is not a referral code at all,
    /// so the caller falls through to the ordinary promo lookup. Once
    /// the code resolves to a referrer, every fraud check rejects with
    /// the same generic error.
    pub fn resolve(
        &self, code: &str, purchaser: Option<&ClientId>, phone: &str, ip: Option<&str>,
    ) -> Result<Option<ReferralGrant>, CheckoutError> {
        let Some(referrer) = self.clients.find_by_referral_code(code)? else {
            return Ok(None);
        };

        // A guest cannot establish first-order eligibility.
        let Some(purchaser_id) = purchaser else {
            warn!(code, "referral rejected: guest purchaser");
            return Err(CheckoutError::ReferralRejected);
        };

        if &referrer.id == purchaser_id {
            warn!(code, "referral rejected: self-referral");
            return Err(CheckoutError::ReferralRejected);
        }

        let purchaser_client = self
            .clients
            .get(purchaser_id)
            .map_err(|_| CheckoutError::ReferralRejected)?;
        if !purchaser_client.is_referral_eligible() {
            warn!(code, purchaser = %purchaser_id, "referral rejected: not a first order");
            return Err(CheckoutError::ReferralRejected);
        }

        // Anti-farming: the purchaser must not share an IP or phone with
        // any of the referrer's past orders.
        for order in self.orders.orders_for_client(&referrer.id)? {
            if order.customer.phone == phone {
                warn!(code, "referral rejected: phone collision");
                return Err(CheckoutError::ReferralRejected);
            }
            if let (Some(order_ip), Some(request_ip)) = (order.client_ip.as_deref(), ip) {
                if order_ip == request_ip {
                    warn!(code, "referral rejected: ip collision");
                    return Err(CheckoutError::ReferralRejected);
                }
            }
        }

        Ok(Some(ReferralGrant { referrer_id: referrer.id, code: referrer.referral_code }))
    }
}
