//! End-to-end checkout behavior.
//!
//! These tests require a running server (`cargo run -p swiftcart-server`)
//! with migrations applied; they create the shared delivery agent and their
//! own throwaway vendors and customers.
//!
//! Run with: cargo test -p swiftcart-integration-tests -- --ignored

use serde_json::Value;
use swiftcart_integration_tests::{
    add_to_cart, base_url, client, create_product, ensure_agent, register, shipping_info,
};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_checkout_fans_out_one_order_per_vendor() {
    let client = client();
    let base = base_url();

    // An agent must exist for checkout to assign deliveries to.
    let _agent = ensure_agent(&client).await;
    let vendor_a = register(&client, "vendor", "vendor-a").await;
    let vendor_b = register(&client, "vendor", "vendor-b").await;
    let customer = register(&client, "customer", "customer").await;

    let product_a = create_product(&client, &vendor_a.token, "Vendor A Widget", "10.00").await;
    let product_b = create_product(&client, &vendor_b.token, "Vendor B Widget", "5.50").await;

    add_to_cart(&client, &customer.token, product_a, 2).await;
    add_to_cart(&client, &customer.token, product_b, 1).await;

    let resp = client
        .post(format!("{base}/api/orders"))
        .bearer_auth(&customer.token)
        .json(&serde_json::json!({
            "payment_method": "Cash",
            "shipping_info": shipping_info(),
            "selected_items": [product_a, product_b],
        }))
        .send()
        .await
        .expect("place order request failed");

    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.expect("order response not JSON");
    let orders = body["orders"].as_array().expect("orders missing");

    // Two vendors in the selection, two orders.
    assert_eq!(orders.len(), 2);

    // Totals are snapshot price x qty per vendor group.
    let totals: Vec<&str> = orders
        .iter()
        .map(|o| o["total"].as_str().expect("total missing"))
        .collect();
    assert!(totals.contains(&"20.00"));
    assert!(totals.contains(&"5.50"));

    // Every order carries the captured shipping block.
    for order in orders {
        assert_eq!(order["shipping_info"]["pin"], "600001");
        assert_eq!(order["payment_method"], "Cash");
        assert_eq!(order["status"], "Ordered");
    }

    // Purchased lines are gone from the cart.
    let cart: Value = client
        .get(format!("{base}/api/cart"))
        .bearer_auth(&customer.token)
        .send()
        .await
        .expect("get cart request failed")
        .json()
        .await
        .expect("cart response not JSON");
    assert_eq!(cart["items"].as_array().expect("items missing").len(), 0);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_unselected_lines_survive_checkout() {
    let client = client();
    let base = base_url();

    let _agent = ensure_agent(&client).await;
    let vendor = register(&client, "vendor", "vendor").await;
    let customer = register(&client, "customer", "customer").await;

    let bought = create_product(&client, &vendor.token, "Bought Now", "3.00").await;
    let kept = create_product(&client, &vendor.token, "Kept For Later", "4.00").await;

    add_to_cart(&client, &customer.token, bought, 1).await;
    add_to_cart(&client, &customer.token, kept, 1).await;

    let resp = client
        .post(format!("{base}/api/orders"))
        .bearer_auth(&customer.token)
        .json(&serde_json::json!({
            "payment_method": "Cash",
            "shipping_info": shipping_info(),
            "selected_items": [bought],
        }))
        .send()
        .await
        .expect("place order request failed");
    assert_eq!(resp.status(), 201);

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
    assert_eq!(items[0]["product"]["id"].as_i64(), Some(kept));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_checkout_with_empty_cart_is_rejected() {
    let client = client();
    let base = base_url();

    let _agent = ensure_agent(&client).await;
    let customer = register(&client, "customer", "customer").await;

    let resp = client
        .post(format!("{base}/api/orders"))
        .bearer_auth(&customer.token)
        .json(&serde_json::json!({
            "payment_method": "Cash",
            "shipping_info": shipping_info(),
            "selected_items": [1],
        }))
        .send()
        .await
        .expect("place order request failed");

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("error response not JSON");
    assert_eq!(body["message"], "Cart is empty");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_checkout_ignoring_selection_is_rejected() {
    let client = client();
    let base = base_url();

    let _agent = ensure_agent(&client).await;
    let vendor = register(&client, "vendor", "vendor").await;
    let customer = register(&client, "customer", "customer").await;

    let product = create_product(&client, &vendor.token, "Unselected", "2.00").await;
    add_to_cart(&client, &customer.token, product, 1).await;

    let resp = client
        .post(format!("{base}/api/orders"))
        .bearer_auth(&customer.token)
        .json(&serde_json::json!({
            "payment_method": "Cash",
            "shipping_info": shipping_info(),
            "selected_items": [product + 1_000_000],
        }))
        .send()
        .await
        .expect("place order request failed");

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("error response not JSON");
    assert_eq!(body["message"], "No valid selected items found in cart");
}
