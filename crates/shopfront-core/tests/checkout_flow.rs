//! End-to-end cart → checkout scenarios against test doubles.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use common::{money, GatewayBehavior, TestCatalog, TestGateway, TestInventory, TestStore};
use shopfront_core::validation::{CartValidation, CartValidator};
use shopfront_core::{
    BulkDiscountRule, Cart, CheckoutResult, CheckoutService, CoreError, DiscountEngine, Money,
    OrderDiscountRule, OrderStatus, OrderStore,
};

fn reference_cart() -> Cart {
    let mut cart =
        Cart::new(TestCatalog::reference()).with_discounts(Arc::new(DiscountEngine::standard()));
    cart.add_item("SKU-A", 2).unwrap();
    cart.add_item("SKU-B", 12).unwrap();
    cart.add_item("SKU-C", 3).unwrap();
    cart
}

// =============================================================================
// Pricing
// =============================================================================

#[test]
fn reference_cart_prices_exactly() {
    let cart = reference_cart();

    assert_eq!(cart.calculate_subtotal(), money("4050"));
    assert_eq!(cart.calculate_discount(), money("262.5"));
    assert_eq!(cart.calculate_total(), money("3787.5"));

    let applied = cart.applied_discounts();
    assert_eq!(applied.len(), 2);
    assert_eq!(applied[0].rule_name(), BulkDiscountRule::NAME);
    assert_eq!(applied[0].amount(), money("60"));
    assert_eq!(applied[1].rule_name(), OrderDiscountRule::NAME);
    assert_eq!(applied[1].amount(), money("202.5"));
}

#[test]
fn capacity_failure_leaves_cart_empty() {
    let mut cart = Cart::new(TestCatalog::with(&[("SKU-LIM", "20")]))
        .with_inventory(TestInventory::with(&[("SKU-LIM", 5)]));

    let err = cart.add_item("SKU-LIM", 10).unwrap_err();
    assert!(matches!(
        err,
        CoreError::InsufficientStock {
            available: 5,
            requested: 10,
            ..
        }
    ));
    assert!(cart.is_empty());
}

#[test]
fn unknown_sku_in_inventory_has_no_stock() {
    let mut cart = Cart::new(TestCatalog::with(&[("SKU-NEW", "20")]))
        .with_inventory(TestInventory::with(&[]));

    assert!(matches!(
        cart.add_item("SKU-NEW", 1),
        Err(CoreError::InsufficientStock { available: 0, .. })
    ));
}

// =============================================================================
// Cart Validator
// =============================================================================

#[test]
fn validator_reports_each_reason() {
    assert_eq!(
        CartValidator::validate(None).reason(),
        Some("cart is required")
    );

    let empty = Cart::new(TestCatalog::reference());
    assert_eq!(
        CartValidator::validate(Some(&empty)).reason(),
        Some("cannot checkout an empty cart")
    );

    let mut free = Cart::new(TestCatalog::with(&[("FREEBIE", "0")]));
    free.add_item("FREEBIE", 1).unwrap();
    assert_eq!(
        CartValidator::validate(Some(&free)).reason(),
        Some("total must be greater than zero")
    );

    assert_eq!(
        CartValidator::validate(Some(&reference_cart())),
        CartValidation::Valid
    );
}

// =============================================================================
// Checkout
// =============================================================================

#[test]
fn successful_checkout_charges_total_and_persists_order() {
    let cart = reference_cart();
    let gateway = TestGateway::new(GatewayBehavior::Approve);
    let store = TestStore::new();
    let service = CheckoutService::new(gateway.clone()).with_store(store.clone());

    let result = service.checkout(&cart, "tok_visa").unwrap();

    let order_id = match &result {
        CheckoutResult::Success { order_id, payment } => {
            assert_eq!(payment.transaction_id(), Some("txn_1"));
            order_id.clone()
        }
        other => panic!("expected success, got {other:?}"),
    };
    assert!(order_id.starts_with("ORD-"));
    assert_eq!(order_id.len(), 12);

    assert_eq!(gateway.charges(), vec![(money("3787.5"), "tok_visa".to_string())]);

    let order = store.get_by_id(&order_id).unwrap().expect("order saved");
    assert_eq!(order.subtotal(), money("4050"));
    assert_eq!(order.discount_amount(), money("262.5"));
    assert_eq!(order.total(), money("3787.5"));
    assert_eq!(order.transaction_id(), "txn_1");
    assert_eq!(order.status(), OrderStatus::Completed);

    let skus: Vec<&str> = order.line_items().iter().map(|l| l.sku()).collect();
    assert_eq!(skus, vec!["SKU-A", "SKU-B", "SKU-C"]);

    // The core never clears the cart
    assert_eq!(cart.item_count(), 3);
}

#[test]
fn checkout_without_store_still_succeeds() {
    let cart = reference_cart();
    let service = CheckoutService::new(TestGateway::new(GatewayBehavior::Approve));

    let result = service.checkout(&cart, "tok_visa").unwrap();
    assert!(result.is_success());
}

#[test]
fn blank_token_never_reaches_gateway() {
    let cart = reference_cart();
    let gateway = TestGateway::new(GatewayBehavior::Approve);
    let service = CheckoutService::new(gateway.clone());

    for token in ["", "   "] {
        let result = service.checkout(&cart, token).unwrap();
        assert_eq!(result.error_message(), Some("payment token is required"));
        assert!(result.payment().is_none());
    }
    assert_eq!(gateway.call_count(), 0);
}

#[test]
fn empty_cart_never_reaches_gateway() {
    let cart = Cart::new(TestCatalog::reference());
    let gateway = TestGateway::new(GatewayBehavior::Approve);
    let store = TestStore::new();
    let service = CheckoutService::new(gateway.clone()).with_store(store.clone());

    let result = service.checkout(&cart, "tok_visa").unwrap();

    assert_eq!(result.error_message(), Some("cannot checkout an empty cart"));
    assert_eq!(gateway.call_count(), 0);
    assert_eq!(store.len(), 0);
}

#[test]
fn token_is_checked_before_cart() {
    let cart = Cart::new(TestCatalog::reference());
    let service = CheckoutService::new(TestGateway::new(GatewayBehavior::Approve));

    let result = service.checkout(&cart, "").unwrap();
    assert_eq!(result.error_message(), Some("payment token is required"));
}

#[test]
fn declined_payment_creates_no_order() {
    let cart = reference_cart();
    let gateway = TestGateway::new(GatewayBehavior::Decline("Card declined"));
    let store = TestStore::new();
    let service = CheckoutService::new(gateway.clone()).with_store(store.clone());

    let result = service.checkout(&cart, "tok_visa").unwrap();

    assert!(!result.is_success());
    assert_eq!(result.order_id(), None);
    assert_eq!(result.error_message(), Some("payment failed: Card declined"));
    assert_eq!(
        result.payment().and_then(|p| p.error_message()),
        Some("Card declined")
    );
    assert_eq!(gateway.call_count(), 1);
    assert_eq!(store.len(), 0);
}

#[test]
fn gateway_fault_becomes_typed_failure() {
    let cart = reference_cart();
    let store = TestStore::new();
    let service = CheckoutService::new(TestGateway::new(GatewayBehavior::Fault("connection reset")))
        .with_store(store.clone());

    let result = service.checkout(&cart, "tok_visa").unwrap();

    assert_eq!(
        result.error_message(),
        Some("payment failed: payment processing error: connection reset")
    );
    assert!(result.payment().is_some_and(|p| !p.is_success()));
    assert_eq!(store.len(), 0);
}

#[test]
fn success_without_transaction_id_is_a_failure() {
    let cart = reference_cart();
    let store = TestStore::new();
    let service = CheckoutService::new(TestGateway::new(GatewayBehavior::BlankTransaction))
        .with_store(store.clone());

    let result = service.checkout(&cart, "tok_visa").unwrap();

    assert!(!result.is_success());
    assert_eq!(store.len(), 0);
}

#[test]
fn store_fault_after_charge_is_surfaced() {
    let cart = reference_cart();
    let gateway = TestGateway::new(GatewayBehavior::Approve);
    let service = CheckoutService::new(gateway.clone()).with_store(TestStore::failing());

    let err = service.checkout(&cart, "tok_visa").unwrap_err();

    match err {
        CoreError::Persistence {
            order_id,
            transaction_id,
            ..
        } => {
            assert!(order_id.starts_with("ORD-"));
            assert_eq!(transaction_id, "txn_1");
        }
        other => panic!("expected persistence error, got {other:?}"),
    }
    assert_eq!(gateway.call_count(), 1);
}

#[test]
fn each_checkout_gets_its_own_order() {
    let cart = reference_cart();
    let store = TestStore::new();
    let service =
        CheckoutService::new(TestGateway::new(GatewayBehavior::Approve)).with_store(store.clone());

    let first = service.checkout(&cart, "tok_visa").unwrap();
    let second = service.checkout(&cart, "tok_visa").unwrap();

    assert_ne!(first.order_id(), second.order_id());
    assert_eq!(store.len(), 2);
}

#[test]
fn date_range_lookup_is_inclusive_and_newest_first() {
    let cart = reference_cart();
    let store = TestStore::new();
    let service =
        CheckoutService::new(TestGateway::new(GatewayBehavior::Approve)).with_store(store.clone());

    let start = Utc::now() - Duration::seconds(1);
    service.checkout(&cart, "tok_1").unwrap();
    service.checkout(&cart, "tok_2").unwrap();
    let end = Utc::now() + Duration::seconds(1);

    let orders = store.get_by_date_range(start, end).unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders[0].created_at() >= orders[1].created_at());

    let before = store
        .get_by_date_range(start - Duration::hours(2), start - Duration::hours(1))
        .unwrap();
    assert!(before.is_empty());
}

#[test]
fn discount_consuming_subtotal_blocks_checkout() {
    let mut engine = DiscountEngine::new();
    engine
        .add_rule(BulkDiscountRule::new(1, shopfront_core::DiscountRate::from_bps(10_000)))
        .unwrap();
    let mut cart =
        Cart::new(TestCatalog::with(&[("SKU-X", "10")])).with_discounts(Arc::new(engine));
    cart.add_item("SKU-X", 1).unwrap();
    assert_eq!(cart.calculate_total(), Money::zero());

    let gateway = TestGateway::new(GatewayBehavior::Approve);
    let result = CheckoutService::new(gateway.clone())
        .checkout(&cart, "tok_visa")
        .unwrap();

    assert_eq!(result.error_message(), Some("total must be greater than zero"));
    assert_eq!(gateway.call_count(), 0);
}
