// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::implementation::clients::ClientDirectory;

    #[test]
    fn test_register_assigns_referral_code() {
        let directory = ClientDirectory::new();
        let client = directory.register(Some("0550123456".to_string())).expect("register");

        assert!(client.referral_code.starts_with("REF-"));
        assert_eq!(client.order_count, 0);
        assert!(client.is_referral_eligible());
    }

    #[test]
    fn test_find_by_referral_code() {
        let directory = ClientDirectory::new();
        let client = directory.register(None).expect("register");

        let found = directory
            .find_by_referral_code(&client.referral_code)
            .expect("lookup")
            .expect("exists");
        assert_eq!(found.id, client.id);
    }

    #[test]
    fn test_referral_code_lookup_is_case_insensitive() {
        let directory = ClientDirectory::new();
        let client = directory.register(None).expect("register");

        let lowered = client.referral_code.to_lowercase();
        let found = directory.find_by_referral_code(&lowered).expect("lookup");
        assert!(found.is_some());
    }

    #[test]
    fn test_unknown_referral_code_resolves_to_none() {
        let directory = ClientDirectory::new();
        let found = directory.find_by_referral_code("REF-UNKNOWN1").expect("lookup");
        assert!(found.is_none());
    }

    #[test]
    fn test_client_with_orders_is_not_eligible() {
        let directory = ClientDirectory::new();
        let client = directory.register(None).expect("register");

        {
            let mut clients = directory.clients.lock().expect("lock");
            clients.get_mut(&client.id).expect("client").order_count = 1;
        }

        let reloaded = directory.get(&client.id).expect("get");
        assert!(!reloaded.is_referral_eligible());
    }
}
