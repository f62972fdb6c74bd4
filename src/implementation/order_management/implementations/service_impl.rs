//! Service implementation.
//!
//! Business logic implementations for the OrderService type.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::errors::CheckoutError;
use crate::implementation::clients::{ClientDirectory, ClientId};
use crate::implementation::loyalty::{LoyaltyLedger, LoyaltySettings};
use crate::implementation::now;
use crate::implementation::stock::StockService;

use super::super::types::basic_types::{OrderId, OrderStatus};
use super::super::types::main_order_types::Order;
use super::super::types::service_types::OrderService;

impl OrderService {
    /// Creates a new order service wired to the stores settlement
    /// touches.
    #[must_use]
    pub fn new(
        loyalty: LoyaltyLedger, stock: StockService, clients: ClientDirectory,
        settings: LoyaltySettings,
    ) -> Self {
        Self {
            orders: Arc::new(Mutex::new(HashMap::new())),
            orders_by_client: Arc::new(Mutex::new(HashMap::new())),
            order_counter: Arc::new(Mutex::new(1000)),
            loyalty,
            stock,
            clients,
            settings,
        }
    }

    /// Generates the next order number.
    pub(crate) fn next_order_number(&self) -> Result<String, CheckoutError> {
        let mut counter = self.order_counter.lock().map_err(|_| CheckoutError::Lock)?;
        let num = *counter;
        *counter += 1;
        Ok(format!("#{}", num))
    }

    /// Inserts a freshly assembled order. Only checkout calls this, at
    /// the end of its commit.
    pub(crate) fn insert_order(&self, order: Order) -> Result<(), CheckoutError> {
        let mut orders = self.orders.lock().map_err(|_| CheckoutError::Lock)?;
        let mut by_client = self.orders_by_client.lock().map_err(|_| CheckoutError::Lock)?;

        if let Some(client_id) = &order.client_id {
            by_client.entry(client_id.clone()).or_insert_with(Vec::new).push(order.id.clone());
        }
        orders.insert(order.id.clone(), order);
        Ok(())
    }

    /// Gets an order by ID.
    pub fn get_order(&self, id: &OrderId) -> Result<Order, CheckoutError> {
        let orders = self.orders.lock().map_err(|_| CheckoutError::Lock)?;
        orders
            .get(id)
            .cloned()
            .ok_or_else(|| CheckoutError::OrderNotFound(id.to_string()))
    }

    /// Gets orders for a client, most recent first.
    pub fn orders_for_client(&self, client_id: &ClientId) -> Result<Vec<Order>, CheckoutError> {
        let orders = self.orders.lock().map_err(|_| CheckoutError::Lock)?;
        let by_client = self.orders_by_client.lock().map_err(|_| CheckoutError::Lock)?;

        let order_ids = by_client.get(client_id).cloned().unwrap_or_default();
        let mut client_orders: Vec<Order> =
            order_ids.iter().filter_map(|id| orders.get(id).cloned()).collect();

        client_orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(client_orders)
    }

    /// Updates the status of an order.
    ///
    /// The reachability check and the status write happen under the
    /// orders guard, so the entry into DELIVERED is unique even under
    /// duplicate concurrent updates. Settlement side effects run after
    /// the guard is released. Re-submitting DELIVERED on a delivered
    /// order is a no-op.
    pub fn update_status(
        &self, order_id: &OrderId, target: OrderStatus,
    ) -> Result<Order, CheckoutError> {
        let (order, entered_delivered) = {
            let mut orders = self.orders.lock().map_err(|_| CheckoutError::Lock)?;
            let order = orders
                .get_mut(order_id)
                .ok_or_else(|| CheckoutError::OrderNotFound(order_id.to_string()))?;

            if target == OrderStatus::Delivered && order.status == OrderStatus::Delivered {
                return Ok(order.clone());
            }

            if !order.status.can_transition_to(target) {
                warn!(
                    order_id = %order_id,
                    from = %order.status,
                    to = %target,
                    "rejected status transition"
                );
                return Err(CheckoutError::InvalidTransition {
                    from: order.status.to_string(),
                    to:   target.to_string(),
                });
            }

            order.record_transition(target);

            let entered_delivered = target == OrderStatus::Delivered;
            if entered_delivered {
                order.settled_at = Some(now());
            }
            (order.clone(), entered_delivered)
        };

        info!(order_id = %order_id, status = %target, "order status updated");

        if entered_delivered {
            self.settle(&order)?;
        }
        Ok(order)
    }

    /// Settlement for a freshly delivered order: loyalty accrual,
    /// referral reward, variant stock finalization. Called exactly once
    /// per order, on its unique entry into DELIVERED.
    fn settle(&self, order: &Order) -> Result<(), CheckoutError> {
        info!(order_id = %order.id, total = order.total_price, "settling delivered order");

        let rate = self.settings.points_conversion_rate;
        if let Some(client_id) = &order.client_id {
            let points = if rate > 0 { (order.total_price / rate) as i64 } else { 0 };
            if points > 0 {
                self.loyalty.credit(
                    client_id.clone(),
                    points,
                    format!("Order {} delivered", order.order_number),
                )?;
            }
        }

        if let Some(referrer_id) = &order.referrer_id {
            // The referrer may have been deleted since; settlement of the
            // purchaser's order still goes through.
            if self.clients.get(referrer_id).is_ok() {
                self.loyalty.credit(
                    referrer_id.clone(),
                    self.settings.referral_reward_points,
                    format!("Referral reward for order {}", order.order_number),
                )?;
            }
        }

        self.stock.settle_variants(&order.settlement_lines(), &order.id.0)?;
        Ok(())
    }
}
