//! Checkout request types and field validation

use serde::{Deserialize, Serialize};

use crate::errors::FieldError;
use crate::implementation::clients::ClientId;
use crate::types::catalog::{ProductId, SpecificationChoice};
use crate::types::geography::{CommuneId, DeliveryType, WilayaId};

/// One requested order line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestLine {
    /// Product to buy.
    pub product_id:           ProductId,
    /// Units wanted.
    pub quantity:             u64,
    /// Chosen specification values, empty for simple products.
    #[serde(default)]
    pub specification_values: Vec<SpecificationChoice>,
}

impl RequestLine {
    /// Creates a line without specification choices.
    #[must_use]
    pub fn new(product_id: ProductId, quantity: u64) -> Self {
        Self { product_id, quantity, specification_values: Vec::new() }
    }

    /// Adds a specification choice.
    #[must_use]
    pub fn with_choice(mut self, choice: SpecificationChoice) -> Self {
        self.specification_values.push(choice);
        self
    }
}

/// Order-creation request, as the storefront submits it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Requested lines.
    pub items: Vec<RequestLine>,
    /// Customer first name.
    pub first_name: String,
    /// Customer last name.
    pub last_name: String,
    /// Customer phone.
    pub phone: String,
    /// Street address.
    pub address: String,
    /// Destination wilaya.
    pub wilaya_id: WilayaId,
    /// Destination commune.
    pub commune_id: CommuneId,
    /// Delivery type.
    pub delivery_type: DeliveryType,
    /// Promo or referral code.
    #[serde(default)]
    pub promo_code: Option<String>,
    /// Redeem the purchaser's loyalty balance against this order.
    #[serde(default)]
    pub use_loyalty_points: bool,
    /// Authenticated purchaser, `None` for guest checkout.
    #[serde(default)]
    pub client_id: Option<ClientId>,
    /// Requester IP.
    #[serde(default)]
    pub client_ip: Option<String>,
}

impl OrderRequest {
    /// Shape-level field checks. Catalog and geography lookups are the
    /// service's job; everything reported here is visible on the request
    /// alone.
    pub(crate) fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.items.is_empty() {
            errors.push(FieldError::new("items", "at least one item is required"));
        }
        for (i, line) in self.items.iter().enumerate() {
            if line.quantity == 0 {
                errors.push(FieldError::new(
                    format!("items[{}].quantity", i),
                    "must be at least 1",
                ));
            }
        }

        if self.first_name.trim().is_empty() {
            errors.push(FieldError::new("first_name", "must not be blank"));
        }
        if self.last_name.trim().is_empty() {
            errors.push(FieldError::new("last_name", "must not be blank"));
        }
        if self.address.trim().is_empty() {
            errors.push(FieldError::new("address", "must not be blank"));
        }

        if self.phone.trim().is_empty() {
            errors.push(FieldError::new("phone", "must not be blank"));
        } else if !is_valid_phone(&self.phone) {
            errors.push(FieldError::new("phone", "must be a valid phone number"));
        }

        if self.use_loyalty_points && self.client_id.is_none() {
            errors.push(FieldError::new("use_loyalty_points", "requires an account"));
        }

        errors
    }
}

/// Digits with optional separators, 8 to 15 digits total.
fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    let shape_ok = phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == ' ' || c == '-');
    shape_ok && (8..=15).contains(&digits)
}
