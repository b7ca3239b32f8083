//! Integration tests for SwiftCart.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p swiftcart-cli -- migrate
//!
//! # Start the server
//! cargo run -p swiftcart-server
//!
//! # Run integration tests
//! cargo test -p swiftcart-integration-tests -- --ignored
//! ```
//!
//! Tests talk to a running server over HTTP and create their own throwaway
//! accounts (unique emails per run), so they can be re-run against the same
//! database.

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API server (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("SWIFTCART_BASE_URL").unwrap_or_else(|_| "http://localhost:5050".to_string())
}

/// A registered account and its bearer token.
pub struct TestAccount {
    pub token: String,
    pub user_id: i32,
    pub email: String,
}

/// Build the shared HTTP client.
#[must_use]
pub fn client() -> Client {
    Client::new()
}

/// Unique per-run email for a throwaway account.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@swiftcart.test", Uuid::new_v4().simple())
}

/// Register an account of the given role and return its token.
///
/// # Panics
///
/// Panics if the server rejects the registration; these helpers assume a
/// healthy server and fail the test loudly otherwise.
pub async fn register(client: &Client, role: &str, prefix: &str) -> TestAccount {
    let email = unique_email(prefix);
    let mut body = json!({
        "name": format!("{prefix} test"),
        "email": email,
        "password": "integration-pass-1",
        "role": role,
    });

    // Vendors and agents must carry a 10-digit phone.
    if role == "vendor" || role == "agent" {
        body["phone"] = json!("9876543210");
    }
    if role == "agent" {
        body["region"] = json!("South");
    }

    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&body)
        .send()
        .await
        .expect("register request failed");

    assert_eq!(resp.status(), 201, "registration should succeed");
    let body: Value = resp.json().await.expect("register response not JSON");

    TestAccount {
        token: body["token"].as_str().expect("token missing").to_string(),
        user_id: i32::try_from(body["user"]["id"].as_i64().expect("user id missing"))
            .expect("user id out of range"),
        email,
    }
}

/// Fixed credentials for the shared delivery agent.
///
/// Checkout assigns every delivery to the first agent on record, so all
/// tests funnel through one well-known agent account. This only holds on a
/// test database where no other agent was created first (fresh migrate, no
/// seed).
pub const SHARED_AGENT_EMAIL: &str = "delivery-agent@swiftcart.test";
const SHARED_AGENT_PASSWORD: &str = "integration-pass-1";

/// Register (or log back into) the shared delivery agent.
///
/// # Panics
///
/// Panics if the account can neither be registered nor logged into.
pub async fn ensure_agent(client: &Client) -> TestAccount {
    let base = base_url();
    let resp = client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({
            "name": "Shared Agent",
            "email": SHARED_AGENT_EMAIL,
            "password": SHARED_AGENT_PASSWORD,
            "role": "agent",
            "phone": "9876543210",
            "region": "South",
        }))
        .send()
        .await
        .expect("agent register request failed");

    let resp = if resp.status() == 201 {
        resp
    } else {
        // Already registered by an earlier test; log in instead.
        client
            .post(format!("{base}/api/auth/login"))
            .json(&json!({
                "email": SHARED_AGENT_EMAIL,
                "password": SHARED_AGENT_PASSWORD,
            }))
            .send()
            .await
            .expect("agent login request failed")
    };

    let body: Value = resp.json().await.expect("agent response not JSON");
    TestAccount {
        token: body["token"].as_str().expect("token missing").to_string(),
        user_id: i32::try_from(body["user"]["id"].as_i64().expect("user id missing"))
            .expect("user id out of range"),
        email: SHARED_AGENT_EMAIL.to_string(),
    }
}

/// Create a product as the given vendor and return its ID.
///
/// # Panics
///
/// Panics if the server rejects the creation.
pub async fn create_product(client: &Client, vendor_token: &str, name: &str, price: &str) -> i64 {
    let resp = client
        .post(format!("{}/api/products", base_url()))
        .bearer_auth(vendor_token)
        .json(&json!({
            "name": name,
            "price": price,
            "stock": 50,
            "category": "Test",
            "description": "integration test product",
        }))
        .send()
        .await
        .expect("create product request failed");

    assert_eq!(resp.status(), 201, "product creation should succeed");
    let body: Value = resp.json().await.expect("product response not JSON");
    body["id"].as_i64().expect("product id missing")
}

/// Put a product in the customer's cart.
///
/// # Panics
///
/// Panics if the server rejects the add.
pub async fn add_to_cart(client: &Client, customer_token: &str, product_id: i64, qty: i32) {
    let resp = client
        .post(format!("{}/api/cart", base_url()))
        .bearer_auth(customer_token)
        .json(&json!({ "product_id": product_id, "qty": qty }))
        .send()
        .await
        .expect("add to cart request failed");
    assert!(resp.status().is_success(), "add to cart should succeed");
}

/// Standard shipping block used by checkout tests.
#[must_use]
pub fn shipping_info() -> Value {
    json!({
        "name": "Test Receiver",
        "phone": "9876543210",
        "address": "1 Integration Way",
        "pin": "600001",
        "state": "TN",
    })
}
