//! Stock service

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use tracing::debug;

use crate::errors::CheckoutError;
use crate::types::catalog::ProductId;

use super::{AdjustmentKind, ReservationLine, SettlementLine, StockAdjustment};

/// Variant stock key: (product, specification name, value).
pub(crate) type VariantKey = (ProductId, String, String);

/// Aggregate and variant stock levels with an adjustment history.
#[derive(Debug, Clone, Default)]
pub struct StockService {
    /// Aggregate on-hand quantity per product.
    pub(crate) aggregate:   Arc<Mutex<HashMap<ProductId, u64>>>,
    /// Per-variant quantity, finalized at delivery.
    pub(crate) variants:    Arc<Mutex<HashMap<VariantKey, u64>>>,
    /// Append-only movement history.
    pub(crate) adjustments: Arc<Mutex<Vec<StockAdjustment>>>,
}

impl StockService {
    /// Creates a new stock service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets aggregate stock for a product.
    pub fn set_stock(&self, product_id: ProductId, quantity: u64) -> Result<(), CheckoutError> {
        let mut levels = self.aggregate.lock().map_err(|_| CheckoutError::Lock)?;
        let previous = levels.get(&product_id).copied().unwrap_or(0);
        levels.insert(product_id.clone(), quantity);
        drop(levels);

        self.record(StockAdjustment::new(
            product_id,
            AdjustmentKind::Adjustment,
            quantity as i64 - previous as i64,
            previous,
        ))
    }

    /// Sets variant stock for a (product, specification, value) triple.
    pub fn set_variant_stock(
        &self, product_id: ProductId, specification: impl Into<String>, value: impl Into<String>,
        quantity: u64,
    ) -> Result<(), CheckoutError> {
        let mut variants = self.variants.lock().map_err(|_| CheckoutError::Lock)?;
        variants.insert((product_id, specification.into(), value.into()), quantity);
        Ok(())
    }

    /// Current aggregate availability.
    pub fn available(&self, product_id: &ProductId) -> Result<u64, CheckoutError> {
        let levels = self.aggregate.lock().map_err(|_| CheckoutError::Lock)?;
        Ok(levels.get(product_id).copied().unwrap_or(0))
    }

    /// Current variant availability.
    pub fn variant_available(
        &self, product_id: &ProductId, specification: &str, value: &str,
    ) -> Result<u64, CheckoutError> {
        let variants = self.variants.lock().map_err(|_| CheckoutError::Lock)?;
        let key = (product_id.clone(), specification.to_string(), value.to_string());
        Ok(variants.get(&key).copied().unwrap_or(0))
    }

    /// Reserves aggregate stock for every line, all-or-nothing.
    ///
    /// The guard is held across the check and the decrement, so two
    /// concurrent reservations cannot both pass the check for the last
    /// unit.
    pub fn reserve_lines(
        &self, lines: &[ReservationLine], reference: &str,
    ) -> Result<(), CheckoutError> {
        let mut levels = self.aggregate.lock().map_err(|_| CheckoutError::Lock)?;
        let rows = reserve_in(&mut levels, lines)?;
        drop(levels);

        for row in rows {
            self.record(row.with_reference(reference))?;
        }
        Ok(())
    }

    /// Finalizes variant stock for a delivered order. Quantities floor
    /// at zero.
    pub fn settle_variants(
        &self, lines: &[SettlementLine], reference: &str,
    ) -> Result<(), CheckoutError> {
        let mut variants = self.variants.lock().map_err(|_| CheckoutError::Lock)?;
        let mut rows = Vec::new();

        for line in lines {
            for choice in &line.choices {
                let key =
                    (line.product_id.clone(), choice.name.clone(), choice.value.clone());
                let previous = variants.get(&key).copied().unwrap_or(0);
                variants.insert(key, previous.saturating_sub(line.quantity));

                rows.push(
                    StockAdjustment::new(
                        line.product_id.clone(),
                        AdjustmentKind::Settled,
                        -(line.quantity as i64),
                        previous,
                    )
                    .with_reference(reference),
                );
            }
        }
        drop(variants);

        debug!(reference, "variant stock settled");
        for row in rows {
            self.record(row)?;
        }
        Ok(())
    }

    /// Movement history for a product, most recent first.
    pub fn adjustment_history(
        &self, product_id: &ProductId, limit: Option<usize>,
    ) -> Result<Vec<StockAdjustment>, CheckoutError> {
        let adjustments = self.adjustments.lock().map_err(|_| CheckoutError::Lock)?;

        let mut history: Vec<_> =
            adjustments.iter().filter(|a| &a.product_id == product_id).cloned().collect();
        history.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        if let Some(limit) = limit {
            history.truncate(limit);
        }
        Ok(history)
    }

    pub(crate) fn record(&self, adjustment: StockAdjustment) -> Result<(), CheckoutError> {
        let mut adjustments = self.adjustments.lock().map_err(|_| CheckoutError::Lock)?;
        adjustments.push(adjustment);
        Ok(())
    }
}

/// Checks every line against the levels map, then decrements. Lines for
/// the same product are summed before the check. Returns the adjustment
/// rows to record; on error the map is untouched.
pub(crate) fn reserve_in(
    levels: &mut HashMap<ProductId, u64>, lines: &[ReservationLine],
) -> Result<Vec<StockAdjustment>, CheckoutError> {
    let mut required: HashMap<&ProductId, u64> = HashMap::new();
    for line in lines {
        *required.entry(&line.product_id).or_insert(0) += line.quantity;
    }

    for (product_id, quantity) in &required {
        let available = levels.get(*product_id).copied().unwrap_or(0);
        if *quantity > available {
            return Err(CheckoutError::InsufficientStock {
                product_id: product_id.to_string(),
                available,
                requested: *quantity,
            });
        }
    }

    let mut rows = Vec::with_capacity(required.len());
    for (product_id, quantity) in required {
        let level = levels.entry(product_id.clone()).or_insert(0);
        let previous = *level;
        *level -= quantity;

        rows.push(StockAdjustment::new(
            product_id.clone(),
            AdjustmentKind::Reserved,
            -(quantity as i64),
            previous,
        ));
    }
    Ok(rows)
}
