//! Error types for the checkout engine

use serde::Serialize;
use thiserror::Error;

/// Per-field validation failure detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Request field the failure is about.
    pub field:   String,
    /// Human-readable reason.
    pub message: String,
}

impl FieldError {
    /// Creates a new field error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Checkout-specific errors.
///
/// Business-rule rejections are recovered locally and surfaced to the
/// caller; only `Lock` signals an unusable store and is fatal.
#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    /// One or more request fields are malformed.
    #[error("validation failed: {}", format_fields(.0))]
    Validation(Vec<FieldError>),
    /// No active delivery tariff for the requested destination.
    #[error("delivery not supported for wilaya {wilaya_id} ({delivery_type})")]
    UnsupportedDelivery {
        /// Requested wilaya.
        wilaya_id:     u32,
        /// Requested delivery type.
        delivery_type: String,
    },
    /// Promo code rejected. The wording is deliberately generic: unknown,
    /// inactive, expired and exhausted codes all render the same.
    #[error("invalid or expired code")]
    DiscountRejected,
    /// Referral code rejected. Renders exactly like `DiscountRejected` so
    /// a probing caller cannot tell which fraud check fired.
    #[error("invalid or expired code")]
    ReferralRejected,
    /// A line requested more than the available aggregate stock.
    #[error("insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        /// Product short of stock.
        product_id: String,
        /// Quantity currently available.
        available:  u64,
        /// Quantity requested across the order.
        requested:  u64,
    },
    /// Target status is unreachable from the current one.
    #[error("cannot transition order from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: String,
        /// Requested status.
        to:   String,
    },
    /// Product not found.
    #[error("product not found: {0}")]
    ProductNotFound(String),
    /// Order not found.
    #[error("order not found: {0}")]
    OrderNotFound(String),
    /// Client not found.
    #[error("client not found: {0}")]
    ClientNotFound(String),
    /// Store guard was poisoned. Infrastructure failure, not recoverable.
    #[error("failed to acquire lock")]
    Lock,
}

fn format_fields(errors: &[FieldError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Result type for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;
