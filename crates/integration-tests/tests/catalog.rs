//! Catalog paging scenarios.

#![allow(clippy::unwrap_used)]

use cartwheel_integration_tests::TestShop;

#[tokio::test]
async fn test_pages_split_at_the_configured_size() {
    let shop = TestShop::new();
    for i in 0..7 {
        shop.seed_product(&format!("product-{i}"), 100, 1).await;
    }

    let first = shop.catalog.products_page(1).await.unwrap();
    assert_eq!(first.items.len(), 5);
    assert_eq!(first.total_items, 7);
    assert_eq!(first.total_pages, 2);

    let second = shop.catalog.products_page(2).await.unwrap();
    assert_eq!(second.items.len(), 2);
}

#[tokio::test]
async fn test_page_zero_is_treated_as_page_one() {
    let shop = TestShop::new();
    shop.seed_product("only", 100, 1).await;

    let page = shop.catalog.products_page(0).await.unwrap();
    assert_eq!(page.page, 1);
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn test_page_past_the_end_is_empty_with_totals() {
    let shop = TestShop::new();
    for i in 0..3 {
        shop.seed_product(&format!("product-{i}"), 100, 1).await;
    }

    let page = shop.catalog.products_page(9).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_items, 3);
    assert_eq!(page.total_pages, 1);
}
