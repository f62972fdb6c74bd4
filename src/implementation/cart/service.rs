//! Cart service

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::errors::CheckoutError;
use crate::implementation::clients::ClientId;

use super::CartLine;

/// Per-client cart store.
#[derive(Debug, Clone, Default)]
pub struct CartService {
    /// Cart lines indexed by client.
    pub(crate) carts: Arc<Mutex<HashMap<ClientId, Vec<CartLine>>>>,
}

impl CartService {
    /// Creates a new cart service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces a client's cart lines.
    pub fn set_lines(&self, client_id: ClientId, lines: Vec<CartLine>) -> Result<(), CheckoutError> {
        let mut carts = self.carts.lock().map_err(|_| CheckoutError::Lock)?;
        carts.insert(client_id, lines);
        Ok(())
    }

    /// Adds a line to a client's cart.
    pub fn add_line(&self, client_id: ClientId, line: CartLine) -> Result<(), CheckoutError> {
        let mut carts = self.carts.lock().map_err(|_| CheckoutError::Lock)?;
        carts.entry(client_id).or_default().push(line);
        Ok(())
    }

    /// The client's current cart lines.
    pub fn lines(&self, client_id: &ClientId) -> Result<Vec<CartLine>, CheckoutError> {
        let carts = self.carts.lock().map_err(|_| CheckoutError::Lock)?;
        Ok(carts.get(client_id).cloned().unwrap_or_default())
    }

    /// Empties a client's cart.
    pub fn clear(&self, client_id: &ClientId) -> Result<(), CheckoutError> {
        let mut carts = self.carts.lock().map_err(|_| CheckoutError::Lock)?;
        carts.remove(client_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::catalog::ProductId;

    #[test]
    fn test_lines_accumulate_and_clear() {
        let service = CartService::new();
        let client = ClientId::from_static("client-1");

        service
            .add_line(client.clone(), CartLine::new(ProductId::from_static("prod-001"), 2))
            .expect("add");
        service
            .add_line(client.clone(), CartLine::new(ProductId::from_static("prod-002"), 1))
            .expect("add");
        assert_eq!(service.lines(&client).expect("lines").len(), 2);

        service.clear(&client).expect("clear");
        assert!(service.lines(&client).expect("lines").is_empty());
    }

    #[test]
    fn test_carts_are_per_client() {
        let service = CartService::new();
        let a = ClientId::from_static("client-a");
        let b = ClientId::from_static("client-b");

        service
            .add_line(a.clone(), CartLine::new(ProductId::from_static("prod-001"), 1))
            .expect("add");

        assert_eq!(service.lines(&a).expect("lines").len(), 1);
        assert!(service.lines(&b).expect("lines").is_empty());
    }
}
