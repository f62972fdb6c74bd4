// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::errors::CheckoutError;
    use crate::implementation::stock::{ReservationLine, SettlementLine, StockService};
    use crate::types::catalog::{ProductId, SpecificationChoice};

    #[test]
    fn test_reserve_decrements_aggregate() {
        let service = StockService::new();
        let product = ProductId::from_static("prod-001");
        service.set_stock(product.clone(), 10).expect("set");

        service
            .reserve_lines(&[ReservationLine::new(product.clone(), 3)], "ORD-1")
            .expect("reserve");

        assert_eq!(service.available(&product).expect("available"), 7);
    }

    #[test]
    fn test_reserve_is_all_or_nothing() {
        let service = StockService::new();
        let a = ProductId::from_static("prod-a");
        let b = ProductId::from_static("prod-b");
        service.set_stock(a.clone(), 10).expect("set a");
        service.set_stock(b.clone(), 1).expect("set b");

        let result = service.reserve_lines(
            &[
                ReservationLine::new(a.clone(), 2),
                ReservationLine::new(b.clone(), 5),
            ],
            "ORD-1",
        );

        assert!(matches!(result, Err(CheckoutError::InsufficientStock { .. })));
        // Nothing decremented, including the line that would have fit.
        assert_eq!(service.available(&a).expect("available"), 10);
        assert_eq!(service.available(&b).expect("available"), 1);
    }

    #[test]
    fn test_duplicate_lines_are_summed_before_the_check() {
        let service = StockService::new();
        let product = ProductId::from_static("prod-001");
        service.set_stock(product.clone(), 3).expect("set");

        let result = service.reserve_lines(
            &[
                ReservationLine::new(product.clone(), 2),
                ReservationLine::new(product.clone(), 2),
            ],
            "ORD-1",
        );

        assert!(matches!(result, Err(CheckoutError::InsufficientStock { .. })));
        assert_eq!(service.available(&product).expect("available"), 3);
    }

    #[test]
    fn test_unknown_product_has_zero_stock() {
        let service = StockService::new();
        let product = ProductId::from_static("prod-missing");

        let result =
            service.reserve_lines(&[ReservationLine::new(product.clone(), 1)], "ORD-1");
        assert!(matches!(
            result,
            Err(CheckoutError::InsufficientStock { available: 0, .. })
        ));
    }

    #[test]
    fn test_settle_decrements_variant_only() {
        let service = StockService::new();
        let product = ProductId::from_static("prod-001");
        service.set_stock(product.clone(), 10).expect("set");
        service
            .set_variant_stock(product.clone(), "Couleur", "Noir", 4)
            .expect("set variant");

        service
            .settle_variants(
                &[SettlementLine {
                    product_id: product.clone(),
                    quantity:   1,
                    choices:    vec![SpecificationChoice::new("Couleur", "Noir")],
                }],
                "ORD-1",
            )
            .expect("settle");

        assert_eq!(
            service.variant_available(&product, "Couleur", "Noir").expect("variant"),
            3
        );
        // Aggregate untouched at settlement time.
        assert_eq!(service.available(&product).expect("available"), 10);
    }

    #[test]
    fn test_variant_stock_floors_at_zero() {
        let service = StockService::new();
        let product = ProductId::from_static("prod-001");
        service
            .set_variant_stock(product.clone(), "Taille", "M", 1)
            .expect("set variant");

        service
            .settle_variants(
                &[SettlementLine {
                    product_id: product.clone(),
                    quantity:   3,
                    choices:    vec![SpecificationChoice::new("Taille", "M")],
                }],
                "ORD-1",
            )
            .expect("settle");

        assert_eq!(
            service.variant_available(&product, "Taille", "M").expect("variant"),
            0
        );
    }

    #[test]
    fn test_adjustment_history_records_movements() {
        let service = StockService::new();
        let product = ProductId::from_static("prod-001");
        service.set_stock(product.clone(), 10).expect("set");
        service
            .reserve_lines(&[ReservationLine::new(product.clone(), 2)], "ORD-1")
            .expect("reserve");

        let history = service.adjustment_history(&product, None).expect("history");
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_concurrent_reservations_for_last_unit() {
        let service = Arc::new(StockService::new());
        let product = ProductId::from_static("prod-001");
        service.set_stock(product.clone(), 1).expect("set");

        let handles: Vec<_> = (0..2)
            .map(|i| {
                let service = Arc::clone(&service);
                let product = product.clone();
                std::thread::spawn(move || {
                    service.reserve_lines(
                        &[ReservationLine::new(product, 1)],
                        &format!("ORD-{}", i),
                    )
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().expect("join")).collect();
        let succeeded = results.iter().filter(|r| r.is_ok()).count();

        assert_eq!(succeeded, 1);
        assert_eq!(service.available(&product).expect("available"), 0);
    }

    #[cfg(feature = "full-tests")]
    #[test]
    fn test_reservation_stress_never_oversells() {
        let service = Arc::new(StockService::new());
        let product = ProductId::from_static("prod-001");
        service.set_stock(product.clone(), 50).expect("set");

        let handles: Vec<_> = (0..100)
            .map(|i| {
                let service = Arc::clone(&service);
                let product = product.clone();
                std::thread::spawn(move || {
                    service
                        .reserve_lines(
                            &[ReservationLine::new(product, 1)],
                            &format!("ORD-{}", i),
                        )
                        .is_ok()
                })
            })
            .collect();

        let succeeded = handles
            .into_iter()
            .map(|h| h.join().expect("join"))
            .filter(|ok| *ok)
            .count();

        assert_eq!(succeeded, 50);
        assert_eq!(service.available(&product).expect("available"), 0);
    }
}
