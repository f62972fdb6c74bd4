//! Delivery tariff resolution
//!
//! One tariff row per (wilaya, delivery type). Disabled rows hard-block
//! checkout for that destination; there is no fallback price.

mod service;


pub use service::TariffService;

use crate::types::geography::{DeliveryType, WilayaId};

/// Admin-managed delivery price row.
#[derive(Debug, Clone)]
pub struct DeliveryTariff {
    /// Destination wilaya.
    pub wilaya_id:     WilayaId,
    /// Delivery type the price applies to.
    pub delivery_type: DeliveryType,
    /// Delivery price in dinars.
    pub price:         u64,
    /// Whether orders may use this tariff.
    pub is_active:     bool,
}

impl DeliveryTariff {
    /// Creates an active tariff.
    #[must_use]
    pub fn new(wilaya_id: WilayaId, delivery_type: DeliveryType, price: u64) -> Self {
        Self { wilaya_id, delivery_type, price, is_active: true }
    }
}
