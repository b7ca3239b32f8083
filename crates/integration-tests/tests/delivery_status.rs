//! Delivery timeline behavior.
//!
//! Run with: cargo test -p swiftcart-integration-tests -- --ignored

use serde_json::{Value, json};
use swiftcart_integration_tests::{
    add_to_cart, base_url, client, create_product, ensure_agent, register, shipping_info,
};

/// Place one order as a fresh customer and return the agent's first delivery.
async fn place_order_and_get_delivery(
    client: &reqwest::Client,
    agent_token: &str,
) -> Value {
    let base = base_url();
    let vendor = register(client, "vendor", "vendor").await;
    let customer = register(client, "customer", "customer").await;

    let product = create_product(client, &vendor.token, "Delivered Widget", "9.99").await;
    add_to_cart(client, &customer.token, product, 1).await;

    let resp = client
        .post(format!("{base}/api/orders"))
        .bearer_auth(&customer.token)
        .json(&json!({
            "payment_method": "Cash",
            "shipping_info": shipping_info(),
            "selected_items": [product],
        }))
        .send()
        .await
        .expect("place order request failed");
    assert_eq!(resp.status(), 201);
    let order: Value = resp.json().await.expect("order response not JSON");
    let order_id = order["orders"][0]["id"].as_i64().expect("order id missing");

    let deliveries: Vec<Value> = client
        .get(format!("{base}/api/delivery"))
        .bearer_auth(agent_token)
        .send()
        .await
        .expect("delivery list request failed")
        .json()
        .await
        .expect("delivery list not JSON");

    deliveries
        .into_iter()
        .find(|d| d["order_id"].as_i64() == Some(order_id))
        .expect("delivery for placed order not found")
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_new_delivery_starts_assigned() {
    let client = client();
    let agent = ensure_agent(&client).await;

    let delivery = place_order_and_get_delivery(&client, &agent.token).await;
    let updates = delivery["status_updates"].as_array().expect("timeline missing");

    assert!(!updates.is_empty());
    assert_eq!(updates[0]["status"], "Assigned");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_status_update_appends_to_timeline() {
    let client = client();
    let base = base_url();
    let agent = ensure_agent(&client).await;

    let delivery = place_order_and_get_delivery(&client, &agent.token).await;
    let id = delivery["id"].as_i64().expect("delivery id missing");

    let resp = client
        .put(format!("{base}/api/delivery/{id}/status"))
        .bearer_auth(&agent.token)
        .json(&json!({ "status": "In Transit" }))
        .send()
        .await
        .expect("status update request failed");

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("status response not JSON");
    assert_eq!(body["message"], "Status updated to 'In Transit'");

    let updates = body["status_updates"].as_array().expect("timeline missing");
    assert_eq!(updates.last().expect("empty timeline")["status"], "In Transit");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_invalid_status_is_rejected_without_mutation() {
    let client = client();
    let base = base_url();
    let agent = ensure_agent(&client).await;

    let delivery = place_order_and_get_delivery(&client, &agent.token).await;
    let id = delivery["id"].as_i64().expect("delivery id missing");
    let before = delivery["status_updates"]
        .as_array()
        .expect("timeline missing")
        .len();

    let resp = client
        .put(format!("{base}/api/delivery/{id}/status"))
        .bearer_auth(&agent.token)
        .json(&json!({ "status": "Teleported" }))
        .send()
        .await
        .expect("status update request failed");

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("error response not JSON");
    assert_eq!(body["message"], "Invalid status value");

    // Timeline unchanged.
    let deliveries: Vec<Value> = client
        .get(format!("{base}/api/delivery"))
        .bearer_auth(&agent.token)
        .send()
        .await
        .expect("delivery list request failed")
        .json()
        .await
        .expect("delivery list not JSON");
    let after = deliveries
        .iter()
        .find(|d| d["id"].as_i64() == Some(id))
        .expect("delivery missing")["status_updates"]
        .as_array()
        .expect("timeline missing")
        .len();
    assert_eq!(after, before);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_agent_cannot_update_anothers_delivery() {
    let client = client();
    let base = base_url();

    let assigned_agent = ensure_agent(&client).await;
    let delivery = place_order_and_get_delivery(&client, &assigned_agent.token).await;
    let id = delivery["id"].as_i64().expect("delivery id missing");

    let other_agent = register(&client, "agent", "agent-other").await;
    let resp = client
        .put(format!("{base}/api/delivery/{id}/status"))
        .bearer_auth(&other_agent.token)
        .json(&json!({ "status": "Dispatched" }))
        .send()
        .await
        .expect("status update request failed");

    assert_eq!(resp.status(), 404);
}
