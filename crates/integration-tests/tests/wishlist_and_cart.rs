//! Wishlist and cart edge cases.
//!
//! Run with: cargo test -p swiftcart-integration-tests -- --ignored

use serde_json::{Value, json};
use swiftcart_integration_tests::{add_to_cart, base_url, client, create_product, register};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_duplicate_wishlist_insert_is_rejected() {
    let client = client();
    let base = base_url();

    let vendor = register(&client, "vendor", "vendor").await;
    let customer = register(&client, "customer", "customer").await;
    let product = create_product(&client, &vendor.token, "Wished Widget", "7.00").await;

    let resp = client
        .post(format!("{base}/api/wishlist"))
        .bearer_auth(&customer.token)
        .json(&json!({ "product_id": product }))
        .send()
        .await
        .expect("wishlist add request failed");
    assert_eq!(resp.status(), 201);

    let resp = client
        .post(format!("{base}/api/wishlist"))
        .bearer_auth(&customer.token)
        .json(&json!({ "product_id": product }))
        .send()
        .await
        .expect("wishlist add request failed");
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("error response not JSON");
    assert_eq!(body["message"], "Already in wishlist");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_carted_product_cannot_be_wishlisted() {
    let client = client();
    let base = base_url();

    let vendor = register(&client, "vendor", "vendor").await;
    let customer = register(&client, "customer", "customer").await;
    let product = create_product(&client, &vendor.token, "Carted Widget", "6.00").await;

    add_to_cart(&client, &customer.token, product, 1).await;

    let resp = client
        .post(format!("{base}/api/wishlist"))
        .bearer_auth(&customer.token)
        .json(&json!({ "product_id": product }))
        .send()
        .await
        .expect("wishlist add request failed");
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("error response not JSON");
    assert_eq!(body["message"], "Already in cart");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_wishlisting_unknown_product_is_404() {
    let client = client();
    let customer = register(&client, "customer", "customer").await;

    let resp = client
        .post(format!("{}/api/wishlist", base_url()))
        .bearer_auth(&customer.token)
        .json(&json!({ "product_id": 999_999_999 }))
        .send()
        .await
        .expect("wishlist add request failed");
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_repeat_cart_add_overwrites_quantity() {
    let client = client();
    let base = base_url();

    let vendor = register(&client, "vendor", "vendor").await;
    let customer = register(&client, "customer", "customer").await;
    let product = create_product(&client, &vendor.token, "Requantified Widget", "2.00").await;

    add_to_cart(&client, &customer.token, product, 2).await;
    add_to_cart(&client, &customer.token, product, 5).await;

    let cart: Value = client
        .get(format!("{base}/api/cart"))
        .bearer_auth(&customer.token)
        .send()
        .await
        .expect("get cart request failed")
        .json()
        .await
        .expect("cart response not JSON");

    let items = cart["items"].as_array().expect("items missing");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["qty"], 5);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_cart_add_rejects_zero_quantity() {
    let client = client();

    let vendor = register(&client, "vendor", "vendor").await;
    let customer = register(&client, "customer", "customer").await;
    let product = create_product(&client, &vendor.token, "Zero Qty Widget", "2.00").await;

    let resp = client
        .post(format!("{}/api/cart", base_url()))
        .bearer_auth(&customer.token)
        .json(&json!({ "product_id": product, "qty": 0 }))
        .send()
        .await
        .expect("add to cart request failed");
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("error response not JSON");
    assert_eq!(body["message"], "Invalid product or quantity");
}
