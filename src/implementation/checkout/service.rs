//! Checkout service

use tracing::{info, warn};

use crate::errors::{CheckoutError, FieldError};
use crate::implementation::cart::CartService;
use crate::implementation::clients::ClientDirectory;
use crate::implementation::loyalty::{balance_in, LoyaltyEntry, LoyaltyLedger, LoyaltySettings};
use crate::implementation::now;
use crate::implementation::order_management::{
    CustomerInfo, ItemSnapshot, LocationSnapshot, Order, OrderId, OrderItem, OrderService,
    OrderStatus,
};
use crate::implementation::promotion::{PromoCodeService, PromoGrant, PromoProbe};
use crate::implementation::referral::{ReferralGrant, ReferralValidator};
use crate::implementation::stock::service::reserve_in;
use crate::implementation::stock::{ReservationLine, StockService};
use crate::implementation::tariff::TariffService;
use crate::types::catalog::ProductCatalog;
use crate::types::geography::GeographyDirectory;

use super::request::OrderRequest;

/// The discount source chosen for an order. Promo and referral are
/// mutually exclusive; a code that resolves as a referral replaces the
/// promo path entirely.
#[derive(Debug, Clone)]
enum ResolvedDiscount {
    None,
    Promo(PromoGrant),
    Referral { grant: ReferralGrant, amount: u64 },
}

impl ResolvedDiscount {
    fn amount(&self) -> u64 {
        match self {
            Self::None => 0,
            Self::Promo(grant) => grant.amount,
            Self::Referral { amount, .. } => *amount,
        }
    }

    fn free_shipping(&self) -> bool {
        matches!(self, Self::Promo(grant) if grant.free_shipping)
    }
}

/// Order assembly service: validates requests and commits orders.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    catalog:   ProductCatalog,
    geography: GeographyDirectory,
    tariffs:   TariffService,
    promos:    PromoCodeService,
    referrals: ReferralValidator,
    clients:   ClientDirectory,
    loyalty:   LoyaltyLedger,
    stock:     StockService,
    carts:     CartService,
    orders:    OrderService,
    settings:  LoyaltySettings,
}

impl CheckoutService {
    /// Creates a checkout service over shared stores.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        catalog: ProductCatalog, geography: GeographyDirectory, tariffs: TariffService,
        promos: PromoCodeService, clients: ClientDirectory, loyalty: LoyaltyLedger,
        stock: StockService, carts: CartService, orders: OrderService,
        settings: LoyaltySettings,
    ) -> Self {
        let referrals = ReferralValidator::new(clients.clone(), orders.clone());
        Self {
            catalog,
            geography,
            tariffs,
            promos,
            referrals,
            clients,
            loyalty,
            stock,
            carts,
            orders,
            settings,
        }
    }

    /// Pre-checkout promo feedback for the storefront UI. No side
    /// effects.
    pub fn probe_promo_code(&self, code: &str, amount: u64) -> Result<PromoProbe, CheckoutError> {
        self.promos.probe(code, amount)
    }

    /// Places an order.
    ///
    /// Validation and resolution run first against live reads; the
    /// mutating tail re-validates everything behind jointly held store
    /// guards, so a rejection at any point leaves every store and the
    /// cart untouched.
    pub fn place_order(&self, request: OrderRequest) -> Result<Order, CheckoutError> {
        let mut errors = request.field_errors();

        let wilaya = self.geography.wilaya(request.wilaya_id)?;
        let commune = self.geography.commune(request.commune_id)?;
        match (&wilaya, &commune) {
            (None, _) => errors.push(FieldError::new("wilaya_id", "unknown wilaya")),
            (Some(_), None) => errors.push(FieldError::new("commune_id", "unknown commune")),
            (Some(w), Some(c)) if c.wilaya_id != w.id => {
                errors.push(FieldError::new(
                    "commune_id",
                    "commune does not belong to the wilaya",
                ));
            },
            _ => {},
        }

        let items = self.build_items(&request, &mut errors)?;

        if let Some(client_id) = &request.client_id {
            // Requester identity comes from the session layer; an unknown
            // id is a broken collaborator, not a form mistake.
            self.clients.get(client_id)?;
        }

        if !errors.is_empty() {
            return Err(CheckoutError::Validation(errors));
        }
        let (Some(wilaya), Some(commune)) = (wilaya, commune) else {
            return Err(CheckoutError::Validation(errors));
        };

        let tariff_price = self.tariffs.resolve(request.wilaya_id, request.delivery_type)?;
        let products_total: u64 = items.iter().map(OrderItem::line_total).sum();

        let discount = self.resolve_discount(&request, products_total)?;
        let delivery_price = if discount.free_shipping() { 0 } else { tariff_price };

        let location = LocationSnapshot { wilaya_name: wilaya.name, commune_name: commune.name };
        self.commit(&request, items, location, products_total, delivery_price, discount)
    }

    /// Builds order items with price and metadata snapshots, validating
    /// every line against the catalog.
    fn build_items(
        &self, request: &OrderRequest, errors: &mut Vec<FieldError>,
    ) -> Result<Vec<OrderItem>, CheckoutError> {
        let mut items = Vec::with_capacity(request.items.len());

        for (i, line) in request.items.iter().enumerate() {
            let product = match self.catalog.get(&line.product_id) {
                Ok(product) => product,
                Err(CheckoutError::ProductNotFound(_)) => {
                    errors.push(FieldError::new(
                        format!("items[{}].product_id", i),
                        "unknown product",
                    ));
                    continue;
                },
                Err(err) => return Err(err),
            };

            if !product.is_active {
                errors.push(FieldError::new(
                    format!("items[{}].product_id", i),
                    "product is not available",
                ));
                continue;
            }

            for choice in &line.specification_values {
                match product.specification(&choice.name) {
                    Some(spec) if spec.allows(&choice.value) => {},
                    _ => errors.push(FieldError::new(
                        format!("items[{}].specification_values", i),
                        format!("invalid choice {}={}", choice.name, choice.value),
                    )),
                }
            }

            items.push(OrderItem {
                product_id:        product.id.clone(),
                quantity:          line.quantity,
                price_snapshot:    product.price,
                metadata_snapshot: ItemSnapshot {
                    product_name:   product.name.clone(),
                    specifications: line.specification_values.clone(),
                },
            });
        }

        Ok(items)
    }

    /// Resolves the single discount source for this order. The referral
    /// path is tried first: a code that belongs to a client replaces any
    /// promo interpretation.
    fn resolve_discount(
        &self, request: &OrderRequest, subtotal: u64,
    ) -> Result<ResolvedDiscount, CheckoutError> {
        let Some(code) = request.promo_code.as_deref().map(str::trim).filter(|c| !c.is_empty())
        else {
            return Ok(ResolvedDiscount::None);
        };

        if let Some(grant) = self.referrals.resolve(
            code,
            request.client_id.as_ref(),
            &request.phone,
            request.client_ip.as_deref(),
        )? {
            let amount = self.settings.referral_discount_amount.min(subtotal);
            return Ok(ResolvedDiscount::Referral { grant, amount });
        }

        let grant = self.promos.resolve(code, subtotal)?;
        Ok(ResolvedDiscount::Promo(grant))
    }

    /// The transactional tail of checkout.
    ///
    /// Guards are taken in a fixed order (stock → promo codes → loyalty
    /// → clients), every precondition is re-checked under them, and only
    /// then do stores mutate. Nothing fallible runs after the first
    /// mutation.
    fn commit(
        &self, request: &OrderRequest, items: Vec<OrderItem>, location: LocationSnapshot,
        products_total: u64, delivery_price: u64, discount: ResolvedDiscount,
    ) -> Result<Order, CheckoutError> {
        let order_id = OrderId::generate();
        let reservation: Vec<ReservationLine> = items
            .iter()
            .map(|item| ReservationLine::new(item.product_id.clone(), item.quantity))
            .collect();

        let (adjustment_rows, loyalty_discount, points_debited) = {
            let mut levels = self.stock.aggregate.lock().map_err(|_| CheckoutError::Lock)?;
            let mut codes = self.promos.codes.lock().map_err(|_| CheckoutError::Lock)?;
            let mut ledger = self.loyalty.entries.lock().map_err(|_| CheckoutError::Lock)?;
            let mut clients = self.clients.clients.lock().map_err(|_| CheckoutError::Lock)?;

            // Re-check the promo under its guard: a concurrent checkout
            // may have exhausted the last redemption since resolution.
            if let ResolvedDiscount::Promo(grant) = &discount {
                codes
                    .get(&grant.code)
                    .filter(|p| p.is_redeemable())
                    .ok_or(CheckoutError::DiscountRejected)?;
            }

            // Re-check first-order eligibility: a concurrent order by the
            // same purchaser may have landed since resolution.
            if let ResolvedDiscount::Referral { .. } = &discount {
                let purchaser = request.client_id.as_ref().ok_or(CheckoutError::ReferralRejected)?;
                let client = clients.get(purchaser).ok_or(CheckoutError::ReferralRejected)?;
                if client.order_count != 0 {
                    warn!(order_id = %order_id, "referral rejected in commit: not a first order");
                    return Err(CheckoutError::ReferralRejected);
                }
            }

            // Loyalty redemption is capped by the live balance and by
            // what is still payable after the other discount.
            let (loyalty_discount, points_debited) = match (
                request.use_loyalty_points,
                request.client_id.as_ref(),
            ) {
                (true, Some(client_id)) => {
                    let rate = self.settings.points_conversion_rate;
                    let balance = balance_in(&ledger, client_id).max(0) as u64;
                    let remaining =
                        (products_total + delivery_price).saturating_sub(discount.amount());
                    let value = balance.saturating_mul(rate).min(remaining);
                    let points = if rate > 0 { value.div_ceil(rate) } else { 0 };
                    (value, points)
                },
                _ => (0, 0),
            };

            // All checks done. Reserve stock (check-then-decrement under
            // this guard), then apply the remaining mutations.
            let adjustment_rows = reserve_in(&mut levels, &reservation)?;

            if let ResolvedDiscount::Promo(grant) = &discount {
                if let Some(promo) = codes.get_mut(&grant.code) {
                    promo.use_count += 1;
                }
            }

            if points_debited > 0 {
                if let Some(client_id) = &request.client_id {
                    ledger.push(LoyaltyEntry::new(
                        client_id.clone(),
                        -(points_debited as i64),
                        format!("Points redeemed on order {}", order_id),
                    ));
                }
            }

            if let Some(client_id) = &request.client_id {
                if let Some(client) = clients.get_mut(client_id) {
                    client.order_count += 1;
                    if let ResolvedDiscount::Referral { grant, .. } = &discount {
                        client.referrer_id = Some(grant.referrer_id.clone());
                    }
                }
            }

            (adjustment_rows, loyalty_discount, points_debited)
        };

        let discount_total = discount.amount() + loyalty_discount;
        let total_price = Order::total_for(products_total, delivery_price, discount_total);
        let created_at = now();

        let order = Order {
            id: order_id.clone(),
            order_number: self.orders.next_order_number()?,
            client_id: request.client_id.clone(),
            customer: CustomerInfo {
                first_name: request.first_name.trim().to_string(),
                last_name:  request.last_name.trim().to_string(),
                phone:      request.phone.trim().to_string(),
                address:    request.address.trim().to_string(),
            },
            location,
            delivery_type: request.delivery_type,
            delivery_price,
            products_total,
            discount_total,
            total_price,
            status: OrderStatus::Pending,
            items,
            promo_code: match &discount {
                ResolvedDiscount::Promo(grant) => Some(grant.code.clone()),
                _ => None,
            },
            referrer_id: match &discount {
                ResolvedDiscount::Referral { grant, .. } => Some(grant.referrer_id.clone()),
                _ => None,
            },
            referral_code: match &discount {
                ResolvedDiscount::Referral { grant, .. } => Some(grant.code.clone()),
                _ => None,
            },
            loyalty_points_redeemed: points_debited as i64,
            client_ip: request.client_ip.clone(),
            history: Vec::new(),
            created_at,
            updated_at: created_at,
            settled_at: None,
        };

        self.orders.insert_order(order.clone())?;

        for row in adjustment_rows {
            self.stock.record(row.with_reference(order_id.0.clone()))?;
        }

        if let Some(client_id) = &request.client_id {
            self.carts.clear(client_id)?;
        }

        info!(
            order_id = %order.id,
            number = %order.order_number,
            total = order.total_price,
            "order placed"
        );
        Ok(order)
    }
}
