//! Tariff lookup service

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::errors::CheckoutError;
use crate::types::geography::{DeliveryType, WilayaId};

use super::DeliveryTariff;

/// Tariff management and resolution service.
#[derive(Debug, Clone, Default)]
pub struct TariffService {
    tariffs: Arc<Mutex<HashMap<(WilayaId, DeliveryType), DeliveryTariff>>>,
}

impl TariffService {
    /// Creates a new tariff service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the tariff for its (wilaya, type) key.
    pub fn upsert(&self, tariff: DeliveryTariff) -> Result<(), CheckoutError> {
        let mut tariffs = self.tariffs.lock().map_err(|_| CheckoutError::Lock)?;
        tariffs.insert((tariff.wilaya_id, tariff.delivery_type), tariff);
        Ok(())
    }

    /// Enables or disables a tariff row.
    pub fn set_active(
        &self, wilaya_id: WilayaId, delivery_type: DeliveryType, is_active: bool,
    ) -> Result<(), CheckoutError> {
        let mut tariffs = self.tariffs.lock().map_err(|_| CheckoutError::Lock)?;
        match tariffs.get_mut(&(wilaya_id, delivery_type)) {
            Some(tariff) => {
                tariff.is_active = is_active;
                Ok(())
            },
            None => Err(CheckoutError::UnsupportedDelivery {
                wilaya_id:     wilaya_id.0,
                delivery_type: delivery_type.to_string(),
            }),
        }
    }

    /// Resolves the delivery price for a destination.
    ///
    /// A missing or disabled row rejects the order outright. An admin
    /// disabling a (wilaya, type) pair must hard-block orders using it.
    pub fn resolve(
        &self, wilaya_id: WilayaId, delivery_type: DeliveryType,
    ) -> Result<u64, CheckoutError> {
        let tariffs = self.tariffs.lock().map_err(|_| CheckoutError::Lock)?;
        tariffs
            .get(&(wilaya_id, delivery_type))
            .filter(|t| t.is_active)
            .map(|t| t.price)
            .ok_or(CheckoutError::UnsupportedDelivery {
                wilaya_id:     wilaya_id.0,
                delivery_type: delivery_type.to_string(),
            })
    }
}
