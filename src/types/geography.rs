//! Wilaya/commune reference types
//!
//! Algerian administrative hierarchy used as the delivery address model.
//! Orders snapshot the names so they survive deletion of these rows.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use serde::{Deserialize, Serialize};

use crate::errors::CheckoutError;

/// Wilaya (province) identifier. Wilayas are numbered nationally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WilayaId(pub u32);

impl std::fmt::Display for WilayaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Commune (municipality) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommuneId(pub u32);

impl std::fmt::Display for CommuneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wilaya reference row.
#[derive(Debug, Clone)]
pub struct Wilaya {
    /// Wilaya ID.
    pub id:   WilayaId,
    /// Display name.
    pub name: String,
}

/// Commune reference row.
#[derive(Debug, Clone)]
pub struct Commune {
    /// Commune ID.
    pub id:        CommuneId,
    /// Owning wilaya.
    pub wilaya_id: WilayaId,
    /// Display name.
    pub name:      String,
}

/// How an order is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryType {
    /// Home delivery.
    Domicile,
    /// Pickup at a relay desk.
    StopDesk,
}

impl DeliveryType {
    /// Display name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Domicile => "DOMICILE",
            Self::StopDesk => "STOP_DESK",
        }
    }
}

impl std::fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Wilaya/commune lookup handle shared with the checkout engine.
#[derive(Debug, Clone, Default)]
pub struct GeographyDirectory {
    wilayas:  Arc<Mutex<HashMap<WilayaId, Wilaya>>>,
    communes: Arc<Mutex<HashMap<CommuneId, Commune>>>,
}

impl GeographyDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a wilaya.
    pub fn upsert_wilaya(&self, wilaya: Wilaya) -> Result<(), CheckoutError> {
        let mut wilayas = self.wilayas.lock().map_err(|_| CheckoutError::Lock)?;
        wilayas.insert(wilaya.id, wilaya);
        Ok(())
    }

    /// Inserts or replaces a commune.
    pub fn upsert_commune(&self, commune: Commune) -> Result<(), CheckoutError> {
        let mut communes = self.communes.lock().map_err(|_| CheckoutError::Lock)?;
        communes.insert(commune.id, commune);
        Ok(())
    }

    /// Gets a wilaya by ID.
    pub fn wilaya(&self, id: WilayaId) -> Result<Option<Wilaya>, CheckoutError> {
        let wilayas = self.wilayas.lock().map_err(|_| CheckoutError::Lock)?;
        Ok(wilayas.get(&id).cloned())
    }

    /// Gets a commune by ID.
    pub fn commune(&self, id: CommuneId) -> Result<Option<Commune>, CheckoutError> {
        let communes = self.communes.lock().map_err(|_| CheckoutError::Lock)?;
        Ok(communes.get(&id).cloned())
    }

    /// Removes a wilaya. Orders already placed keep the snapshotted name.
    pub fn remove_wilaya(&self, id: WilayaId) -> Result<(), CheckoutError> {
        let mut wilayas = self.wilayas.lock().map_err(|_| CheckoutError::Lock)?;
        wilayas.remove(&id);
        Ok(())
    }

    /// Removes a commune. Orders already placed keep the snapshotted name.
    pub fn remove_commune(&self, id: CommuneId) -> Result<(), CheckoutError> {
        let mut communes = self.communes.lock().map_err(|_| CheckoutError::Lock)?;
        communes.remove(&id);
        Ok(())
    }
}
