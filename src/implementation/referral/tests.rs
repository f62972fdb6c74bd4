// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::errors::CheckoutError;
    use crate::implementation::clients::{ClientDirectory, ClientId};
    use crate::implementation::loyalty::{LoyaltyLedger, LoyaltySettings};
    use crate::implementation::now;
    use crate::implementation::order_management::{
        CustomerInfo, LocationSnapshot, Order, OrderId, OrderService, OrderStatus,
    };
    use crate::implementation::referral::ReferralValidator;
    use crate::implementation::stock::StockService;
    use crate::types::geography::DeliveryType;

    fn setup() -> (ClientDirectory, OrderService, ReferralValidator) {
        let clients = ClientDirectory::new();
        let orders = OrderService::new(
            LoyaltyLedger::new(),
            StockService::new(),
            clients.clone(),
            LoyaltySettings::default(),
        );
        let validator = ReferralValidator::new(clients.clone(), orders.clone());
        (clients, orders, validator)
    }

    fn order_for(client_id: &ClientId, phone: &str, ip: Option<&str>) -> Order {
        let created_at = now();
        Order {
            id: OrderId::generate(),
            order_number: "#1000".to_string(),
            client_id: Some(client_id.clone()),
            customer: CustomerInfo {
                first_name: "Sid Ali".to_string(),
                last_name:  "Merad".to_string(),
                phone:      phone.to_string(),
                address:    "Cité 1er Novembre".to_string(),
            },
            location: LocationSnapshot {
                wilaya_name:  "Oran".to_string(),
                commune_name: "Es Senia".to_string(),
            },
            delivery_type: DeliveryType::StopDesk,
            delivery_price: 350,
            products_total: 3000,
            discount_total: 0,
            total_price: 3350,
            status: OrderStatus::Pending,
            items: Vec::new(),
            promo_code: None,
            referrer_id: None,
            referral_code: None,
            loyalty_points_redeemed: 0,
            client_ip: ip.map(ToString::to_string),
            history: Vec::new(),
            created_at,
            updated_at: created_at,
            settled_at: None,
        }
    }

    #[test]
    fn test_non_referral_code_falls_through() {
        let (_, _, validator) = setup();
        let purchaser = ClientId::from_static("client-x");

        let outcome = validator
            .resolve("WELCOME10", Some(&purchaser), "0550123456", None)
            .expect("resolve");
        assert!(outcome.is_none());
    }

    #[test]
    fn test_valid_referral_resolves() {
        let (clients, _, validator) = setup();
        let referrer = clients.register(Some("0771000000".to_string())).expect("referrer");
        let purchaser = clients.register(Some("0550123456".to_string())).expect("purchaser");

        let grant = validator
            .resolve(
                &referrer.referral_code,
                Some(&purchaser.id),
                "0550123456",
                Some("41.200.11.7"),
            )
            .expect("resolve")
            .expect("grant");

        assert_eq!(grant.referrer_id, referrer.id);
        assert_eq!(grant.code, referrer.referral_code);
    }

    #[test]
    fn test_self_referral_rejected() {
        let (clients, _, validator) = setup();
        let referrer = clients.register(None).expect("referrer");

        let result =
            validator.resolve(&referrer.referral_code, Some(&referrer.id), "0550123456", None);
        assert!(matches!(result, Err(CheckoutError::ReferralRejected)));
    }

    #[test]
    fn test_guest_purchaser_rejected() {
        let (clients, _, validator) = setup();
        let referrer = clients.register(None).expect("referrer");

        let result = validator.resolve(&referrer.referral_code, None, "0550123456", None);
        assert!(matches!(result, Err(CheckoutError::ReferralRejected)));
    }

    #[test]
    fn test_repeat_customer_rejected() {
        let (clients, _, validator) = setup();
        let referrer = clients.register(None).expect("referrer");
        let purchaser = clients.register(None).expect("purchaser");

        {
            let mut store = clients.clients.lock().expect("lock");
            store.get_mut(&purchaser.id).expect("purchaser").order_count = 1;
        }

        let result =
            validator.resolve(&referrer.referral_code, Some(&purchaser.id), "0550123456", None);
        assert!(matches!(result, Err(CheckoutError::ReferralRejected)));
    }

    #[test]
    fn test_phone_collision_with_referrer_history_rejected() {
        let (clients, orders, validator) = setup();
        let referrer = clients.register(None).expect("referrer");
        let purchaser = clients.register(None).expect("purchaser");

        // The referrer once ordered with the same phone the "new"
        // customer is now using.
        orders
            .insert_order(order_for(&referrer.id, "0550123456", None))
            .expect("insert");

        let result =
            validator.resolve(&referrer.referral_code, Some(&purchaser.id), "0550123456", None);
        assert!(matches!(result, Err(CheckoutError::ReferralRejected)));
    }

    #[test]
    fn test_ip_collision_with_referrer_history_rejected() {
        let (clients, orders, validator) = setup();
        let referrer = clients.register(None).expect("referrer");
        let purchaser = clients.register(None).expect("purchaser");

        orders
            .insert_order(order_for(&referrer.id, "0771000000", Some("41.200.11.7")))
            .expect("insert");

        let result = validator.resolve(
            &referrer.referral_code,
            Some(&purchaser.id),
            "0550123456",
            Some("41.200.11.7"),
        );
        assert!(matches!(result, Err(CheckoutError::ReferralRejected)));
    }

    #[test]
    fn test_distinct_phone_and_ip_pass_the_history_check() {
        let (clients, orders, validator) = setup();
        let referrer = clients.register(None).expect("referrer");
        let purchaser = clients.register(None).expect("purchaser");

        orders
            .insert_order(order_for(&referrer.id, "0771000000", Some("41.200.11.7")))
            .expect("insert");

        let grant = validator
            .resolve(
                &referrer.referral_code,
                Some(&purchaser.id),
                "0550123456",
                Some("105.98.40.2"),
            )
            .expect("resolve");
        assert!(grant.is_some());
    }
}
