//! Client directory service

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use uuid::Uuid;

use crate::errors::CheckoutError;
use crate::implementation::now;

use super::{Client, ClientId};

/// Client store with referral-code lookup.
#[derive(Debug, Clone, Default)]
pub struct ClientDirectory {
    /// Clients indexed by ID.
    pub(crate) clients: Arc<Mutex<HashMap<ClientId, Client>>>,
    /// Referral code → owning client.
    pub(crate) by_referral_code: Arc<Mutex<HashMap<String, ClientId>>>,
}

impl ClientDirectory {
    /// Creates a new client directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a client and assigns a fresh referral code.
    pub fn register(&self, phone: Option<String>) -> Result<Client, CheckoutError> {
        let client = Client {
            id: ClientId::new(Uuid::new_v4().to_string()),
            referral_code: generate_referral_code(),
            referrer_id: None,
            phone,
            order_count: 0,
            created_at: now(),
        };

        let mut clients = self.clients.lock().map_err(|_| CheckoutError::Lock)?;
        let mut by_code = self.by_referral_code.lock().map_err(|_| CheckoutError::Lock)?;

        by_code.insert(client.referral_code.clone(), client.id.clone());
        clients.insert(client.id.clone(), client.clone());

        Ok(client)
    }

    /// Gets a client by ID.
    pub fn get(&self, id: &ClientId) -> Result<Client, CheckoutError> {
        let clients = self.clients.lock().map_err(|_| CheckoutError::Lock)?;
        clients
            .get(id)
            .cloned()
            .ok_or_else(|| CheckoutError::ClientNotFound(id.to_string()))
    }

    /// Resolves a referral code to its owner, if any.
    pub fn find_by_referral_code(&self, code: &str) -> Result<Option<Client>, CheckoutError> {
        let by_code = self.by_referral_code.lock().map_err(|_| CheckoutError::Lock)?;
        let Some(client_id) = by_code.get(&code.to_uppercase()).cloned() else {
            return Ok(None);
        };
        drop(by_code);

        let clients = self.clients.lock().map_err(|_| CheckoutError::Lock)?;
        Ok(clients.get(&client_id).cloned())
    }
}

/// Short uppercase uuid prefix, e.g. `REF-9F21A0C4`.
fn generate_referral_code() -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("REF-{}", raw[..8].to_uppercase())
}
