//! End-to-end checkout scenarios.
//!
//! These drive the full path: seed the store, fill a ledger, check out,
//! then assert on the store and ledger state afterwards.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use rust_decimal::Decimal;

use cartwheel_core::{Price, ProductId};
use cartwheel_integration_tests::{ConflictingStore, TestShop};
use cartwheel_shop::models::Product;
use cartwheel_shop::services::cart::CartLedger;
use cartwheel_shop::services::checkout::{CheckoutError, CheckoutService};
use cartwheel_shop::stores::{OrderStore, StockStore};

// =============================================================================
// Successful Checkout
// =============================================================================

#[tokio::test]
async fn test_checkout_decrements_stock_and_clears_cart() {
    let shop = TestShop::new();
    let user = shop.seed_user("arnold").await;
    let tea = shop.seed_product("tea", 1000, 5).await;

    let mut cart = CartLedger::new();
    cart.add_product(&tea);
    cart.add_product(&tea);
    assert_eq!(cart.total(), Decimal::new(2000, 2));

    let order = shop.checkout.checkout(&mut cart, user.id).await.unwrap();

    assert!(cart.is_empty());
    assert_eq!(order.payment, Decimal::new(2000, 2));
    assert_eq!(order.user_id, user.id);
    assert_eq!(order.lines.len(), 1);
    assert_eq!(order.lines[0].product_id, tea.id);
    assert_eq!(order.lines[0].quantity, 2);
    assert_eq!(order.lines[0].unit_price, tea.price);

    let stored = shop.stores.find_by_id(tea.id).await.unwrap().unwrap();
    assert_eq!(stored.quantity, 3);

    let orders = shop.stores.orders_for_user(user.id).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, order.id);
}

#[tokio::test]
async fn test_checkout_multiple_products_one_sold_line_each() {
    let shop = TestShop::new();
    let user = shop.seed_user("arnold").await;
    let tea = shop.seed_product("tea", 1050, 10).await;
    let coffee = shop.seed_product("coffee", 799, 10).await;

    let mut cart = CartLedger::new();
    cart.add_product(&tea);
    cart.add_product(&tea);
    cart.add_product(&coffee);

    let order = shop.checkout.checkout(&mut cart, user.id).await.unwrap();

    // 2 * 10.50 + 7.99
    assert_eq!(order.payment, Decimal::new(2899, 2));
    assert_eq!(order.lines.len(), 2);
    assert_eq!(shop.stores.find_by_id(tea.id).await.unwrap().unwrap().quantity, 8);
    assert_eq!(
        shop.stores.find_by_id(coffee.id).await.unwrap().unwrap().quantity,
        9
    );
}

// =============================================================================
// Validation Failures
// =============================================================================

#[tokio::test]
async fn test_insufficient_stock_aborts_and_leaves_everything_unchanged() {
    let shop = TestShop::new();
    let user = shop.seed_user("arnold").await;
    let tea = shop.seed_product("tea", 1000, 1).await;

    let mut cart = CartLedger::new();
    cart.add_product(&tea);
    cart.add_product(&tea);
    cart.add_product(&tea);

    let err = shop.checkout.checkout(&mut cart, user.id).await.unwrap_err();
    match err {
        CheckoutError::InsufficientStock {
            product,
            requested,
            available,
        } => {
            assert_eq!(product.id, tea.id);
            assert_eq!(requested, 3);
            assert_eq!(available, 1);
        }
        other => panic!("expected InsufficientStock, got {other}"),
    }

    // Ledger and stock exactly as before.
    assert_eq!(cart.quantity_of(tea.id), 3);
    assert_eq!(shop.stores.find_by_id(tea.id).await.unwrap().unwrap().quantity, 1);
    assert!(shop.stores.orders_for_user(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_vanished_product_aborts_checkout() {
    let shop = TestShop::new();
    let user = shop.seed_user("arnold").await;

    // A product that was never in (or has left) the catalog.
    let ghost = Product {
        id: ProductId::new(999),
        name: "ghost".to_owned(),
        description: String::new(),
        price: Price::new(Decimal::new(100, 2)).unwrap(),
        quantity: 1,
        revision: 1,
    };

    let mut cart = CartLedger::new();
    cart.add_product(&ghost);

    let err = shop.checkout.checkout(&mut cart, user.id).await.unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::ProductNotFound { id } if id == ghost.id
    ));
    assert_eq!(cart.quantity_of(ghost.id), 1);
}

#[tokio::test]
async fn test_failing_line_protects_earlier_lines() {
    let shop = TestShop::new();
    let user = shop.seed_user("arnold").await;
    let tea = shop.seed_product("tea", 1000, 5).await;
    let coffee = shop.seed_product("coffee", 700, 1).await;

    let mut cart = CartLedger::new();
    cart.add_product(&tea);
    cart.add_product(&tea);
    for _ in 0..3 {
        cart.add_product(&coffee);
    }

    let err = shop.checkout.checkout(&mut cart, user.id).await.unwrap_err();
    assert!(matches!(err, CheckoutError::InsufficientStock { .. }));

    // The valid tea line must not have been applied.
    assert_eq!(shop.stores.find_by_id(tea.id).await.unwrap().unwrap().quantity, 5);
    assert_eq!(
        shop.stores.find_by_id(coffee.id).await.unwrap().unwrap().quantity,
        1
    );
    assert_eq!(cart.quantity_of(tea.id), 2);
    assert_eq!(cart.quantity_of(coffee.id), 3);
}

#[tokio::test]
async fn test_empty_cart_cannot_check_out() {
    let shop = TestShop::new();
    let user = shop.seed_user("arnold").await;

    let mut cart = CartLedger::new();
    let err = shop.checkout.checkout(&mut cart, user.id).await.unwrap_err();
    assert!(matches!(err, CheckoutError::EmptyCart));
    assert!(shop.stores.orders_for_user(user.id).await.unwrap().is_empty());
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_racing_checkouts_never_oversell_the_last_unit() {
    let shop = TestShop::new();
    let alice = shop.seed_user("alice-a").await;
    let bob = shop.seed_user("bobby-b").await;
    let last = shop.seed_product("last-unit", 1000, 1).await;

    let mut alice_cart = CartLedger::new();
    alice_cart.add_product(&last);
    let mut bob_cart = CartLedger::new();
    bob_cart.add_product(&last);

    let alice_service = CheckoutService::new(Arc::clone(&shop.stores), &shop.config);
    let bob_service = CheckoutService::new(Arc::clone(&shop.stores), &shop.config);

    let alice_task = tokio::spawn(async move {
        alice_service.checkout(&mut alice_cart, alice.id).await
    });
    let bob_task =
        tokio::spawn(async move { bob_service.checkout(&mut bob_cart, bob.id).await });

    let results = [alice_task.await.unwrap(), bob_task.await.unwrap()];
    let wins = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(wins, 1, "exactly one racing checkout must win");

    for result in &results {
        if let Err(err) = result {
            assert!(
                matches!(
                    err,
                    CheckoutError::InsufficientStock { .. } | CheckoutError::Conflict
                ),
                "loser must see insufficient stock or a retryable conflict, got {err}"
            );
        }
    }

    let stored = shop.stores.find_by_id(last.id).await.unwrap().unwrap();
    assert_eq!(stored.quantity, 0, "stock must never go negative");
}

// =============================================================================
// Conflict Retry
// =============================================================================

#[tokio::test]
async fn test_retry_recovers_from_a_lost_race() {
    let shop = TestShop::new();
    let user = shop.seed_user("arnold").await;
    let tea = shop.seed_product("tea", 1000, 5).await;

    let flaky = Arc::new(ConflictingStore::new(Arc::clone(&shop.stores), 1));
    let service = CheckoutService::new(flaky, &shop.config);

    let mut cart = CartLedger::new();
    cart.add_product(&tea);

    let order = service.checkout_with_retry(&mut cart, user.id).await.unwrap();
    assert_eq!(order.payment, Decimal::new(1000, 2));
    assert!(cart.is_empty());
    assert_eq!(shop.stores.find_by_id(tea.id).await.unwrap().unwrap().quantity, 4);
}

#[tokio::test]
async fn test_retry_gives_up_after_the_attempt_budget() {
    let shop = TestShop::new();
    let user = shop.seed_user("arnold").await;
    let tea = shop.seed_product("tea", 1000, 5).await;

    // More injected conflicts than the attempt budget.
    let flaky = Arc::new(ConflictingStore::new(Arc::clone(&shop.stores), 10));
    let service = CheckoutService::new(flaky, &shop.config);

    let mut cart = CartLedger::new();
    cart.add_product(&tea);

    let err = service
        .checkout_with_retry(&mut cart, user.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::Conflict));

    // Nothing was applied, and the cart survives for a later retry.
    assert_eq!(cart.quantity_of(tea.id), 1);
    assert_eq!(shop.stores.find_by_id(tea.id).await.unwrap().unwrap().quantity, 5);
}
