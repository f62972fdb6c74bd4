//! Service types for order management.
//!
//! The OrderService struct: the order store plus the collaborators
//! settlement needs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::implementation::clients::{ClientDirectory, ClientId};
use crate::implementation::loyalty::{LoyaltyLedger, LoyaltySettings};
use crate::implementation::stock::StockService;

use super::basic_types::OrderId;
use super::main_order_types::Order;

/// Order management service.
#[derive(Debug, Clone)]
pub struct OrderService {
    /// Orders indexed by ID.
    pub(crate) orders: Arc<Mutex<HashMap<OrderId, Order>>>,
    /// Orders indexed by client.
    pub(crate) orders_by_client: Arc<Mutex<HashMap<ClientId, Vec<OrderId>>>>,
    /// Order number counter.
    pub(crate) order_counter: Arc<Mutex<u64>>,
    /// Loyalty ledger credited at settlement.
    pub(crate) loyalty: LoyaltyLedger,
    /// Stock store whose variant levels settle at delivery.
    pub(crate) stock: StockService,
    /// Client directory, read for referrer credit.
    pub(crate) clients: ClientDirectory,
    /// Loyalty program configuration.
    pub(crate) settings: LoyaltySettings,
}
