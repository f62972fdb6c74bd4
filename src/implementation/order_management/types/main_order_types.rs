//! Main order types for the order management system.
//!
//! The Order struct and the customer/location snapshots it embeds.

use crate::implementation::clients::ClientId;
use crate::types::geography::DeliveryType;

use super::basic_types::{OrderId, OrderStatus};
use super::order_types::{OrderItem, StatusChange};

/// Customer contact details frozen onto the order at checkout.
#[derive(Debug, Clone)]
pub struct CustomerInfo {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name:  String,
    /// Contact phone.
    pub phone:      String,
    /// Street address.
    pub address:    String,
}

impl CustomerInfo {
    /// Full name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Delivery location names frozen onto the order. Survives deletion of
/// the wilaya/commune reference rows.
#[derive(Debug, Clone)]
pub struct LocationSnapshot {
    /// Wilaya name at purchase time.
    pub wilaya_name:  String,
    /// Commune name at purchase time.
    pub commune_name: String,
}

/// Complete order.
///
/// Monetary fields are write-once: after creation only `status` (and the
/// history/settlement markers that accompany it) mutate.
#[derive(Debug, Clone)]
pub struct Order {
    /// Order ID.
    pub id: OrderId,
    /// Order number (display).
    pub order_number: String,
    /// Purchasing client, `None` for guest orders.
    pub client_id: Option<ClientId>,
    /// Customer contact snapshot.
    pub customer: CustomerInfo,
    /// Delivery location snapshot.
    pub location: LocationSnapshot,
    /// Delivery type.
    pub delivery_type: DeliveryType,
    /// Delivery price snapshot from the tariff table, in dinars.
    pub delivery_price: u64,
    /// Sum of line totals, in dinars.
    pub products_total: u64,
    /// Total discount applied, in dinars.
    pub discount_total: u64,
    /// Amount due on delivery: max(0, products_total + delivery_price − discount_total).
    pub total_price: u64,
    /// Order status.
    pub status: OrderStatus,
    /// Line items with immutable snapshots.
    pub items: Vec<OrderItem>,
    /// Promo code redeemed, if any.
    pub promo_code: Option<String>,
    /// Referring client, if a referral code was used.
    pub referrer_id: Option<ClientId>,
    /// Referral code used, if any.
    pub referral_code: Option<String>,
    /// Loyalty points debited at checkout.
    pub loyalty_points_redeemed: i64,
    /// Requester IP at checkout.
    pub client_ip: Option<String>,
    /// Status transition history.
    pub history: Vec<StatusChange>,
    /// Creation timestamp.
    pub created_at: u64,
    /// Last update timestamp.
    pub updated_at: u64,
    /// When settlement ran, `None` until delivered.
    pub settled_at: Option<u64>,
}
