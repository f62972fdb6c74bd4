//! Product catalog reference types
//!
//! Read-only collaborator data: the engine looks up price, name and
//! specification metadata at checkout time and freezes them into order
//! snapshots. Later edits or deletion of a product never touch an order.

use std::{
    borrow::Cow,
    collections::HashMap,
    sync::{Arc, Mutex},
};

use serde::{Deserialize, Serialize};

use crate::errors::CheckoutError;

/// Unique product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub Cow<'static, str>);

impl ProductId {
    /// Creates a new product ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    /// Creates a product ID from a static string slice (zero-copy).
    #[must_use]
    pub fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Specification axis a product can be configured on (e.g. "Couleur"
/// with values "Noir"/"Blanc").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specification {
    /// Specification name.
    pub name:   String,
    /// Allowed values.
    pub values: Vec<String>,
}

impl Specification {
    /// Creates a new specification axis.
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self { name: name.into(), values }
    }

    /// Whether `value` is one of the allowed values.
    #[must_use]
    pub fn allows(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// A chosen specification name/value pair on an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificationChoice {
    /// Specification name.
    pub name:  String,
    /// Chosen value.
    pub value: String,
}

impl SpecificationChoice {
    /// Creates a new choice.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// Product row as the catalog exposes it to checkout.
#[derive(Debug, Clone)]
pub struct Product {
    /// Product ID.
    pub id:             ProductId,
    /// Display name.
    pub name:           String,
    /// Current unit price in dinars.
    pub price:          u64,
    /// Specification axes, empty for simple products.
    pub specifications: Vec<Specification>,
    /// Whether the product can be purchased.
    pub is_active:      bool,
}

impl Product {
    /// Creates an active product without specifications.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: u64) -> Self {
        Self { id, name: name.into(), price, specifications: Vec::new(), is_active: true }
    }

    /// Adds a specification axis.
    #[must_use]
    pub fn with_specification(mut self, specification: Specification) -> Self {
        self.specifications.push(specification);
        self
    }

    /// Looks up a specification axis by name.
    #[must_use]
    pub fn specification(&self, name: &str) -> Option<&Specification> {
        self.specifications.iter().find(|s| s.name == name)
    }
}

/// Catalog handle shared with the checkout engine.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: Arc<Mutex<HashMap<ProductId, Product>>>,
}

impl ProductCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a product.
    pub fn upsert(&self, product: Product) -> Result<(), CheckoutError> {
        let mut products = self.products.lock().map_err(|_| CheckoutError::Lock)?;
        products.insert(product.id.clone(), product);
        Ok(())
    }

    /// Gets a product by ID.
    pub fn get(&self, id: &ProductId) -> Result<Product, CheckoutError> {
        let products = self.products.lock().map_err(|_| CheckoutError::Lock)?;
        products
            .get(id)
            .cloned()
            .ok_or_else(|| CheckoutError::ProductNotFound(id.to_string()))
    }

    /// Changes a product's price. Orders already placed keep their
    /// price snapshots.
    pub fn set_price(&self, id: &ProductId, price: u64) -> Result<(), CheckoutError> {
        let mut products = self.products.lock().map_err(|_| CheckoutError::Lock)?;
        let product = products
            .get_mut(id)
            .ok_or_else(|| CheckoutError::ProductNotFound(id.to_string()))?;
        product.price = price;
        Ok(())
    }

    /// Removes a product. Orders already placed are unaffected.
    pub fn remove(&self, id: &ProductId) -> Result<(), CheckoutError> {
        let mut products = self.products.lock().map_err(|_| CheckoutError::Lock)?;
        products.remove(id);
        Ok(())
    }
}
