//! Implementation details for the checkout engine

pub mod cart;
pub mod checkout;
pub mod clients;
pub mod loyalty;
pub mod order_management;
pub mod promotion;
pub mod referral;
pub mod stock;
pub mod tariff;

/// Current time as epoch seconds.
#[must_use]
pub(crate) fn now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
