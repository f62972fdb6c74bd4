//! Reference-data types consumed by the checkout engine
//!
//! The catalog and geography tables are owned by the surrounding store
//! admin; the engine reads them and snapshots what it needs onto orders.

pub mod catalog;
pub mod geography;

pub use catalog::{Product, ProductCatalog, ProductId, Specification, SpecificationChoice};
pub use geography::{Commune, CommuneId, DeliveryType, GeographyDirectory, Wilaya, WilayaId};
