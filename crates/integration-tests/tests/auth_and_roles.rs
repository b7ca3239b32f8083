//! Authentication and role-gate behavior.
//!
//! Run with: cargo test -p swiftcart-integration-tests -- --ignored

use serde_json::{Value, json};
use swiftcart_integration_tests::{base_url, client, register, unique_email};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_register_login_and_me_round_trip() {
    let client = client();
    let base = base_url();

    let account = register(&client, "customer", "roundtrip").await;

    let resp = client
        .post(format!("{base}/api/auth/login"))
        .json(&json!({ "email": account.email, "password": "integration-pass-1" }))
        .send()
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("login response not JSON");
    let token = body["token"].as_str().expect("token missing");

    let me: Value = client
        .get(format!("{base}/api/auth/me"))
        .bearer_auth(token)
        .send()
        .await
        .expect("me request failed")
        .json()
        .await
        .expect("me response not JSON");

    assert_eq!(me["email"], account.email.as_str());
    assert_eq!(me["role"], "customer");
    // The password hash never appears in any response shape.
    assert!(me.get("password").is_none());
    assert!(me.get("password_hash").is_none());
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_login_with_wrong_password_is_401() {
    let client = client();
    let account = register(&client, "customer", "badpass").await;

    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": account.email, "password": "not-the-password" }))
        .send()
        .await
        .expect("login request failed");

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.expect("error response not JSON");
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_duplicate_registration_is_400() {
    let client = client();
    let account = register(&client, "customer", "dupe").await;

    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "name": "Second Registration",
            "email": account.email,
            "password": "integration-pass-1",
            "role": "customer",
        }))
        .send()
        .await
        .expect("register request failed");

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("error response not JSON");
    assert_eq!(body["message"], "User already exists");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_vendor_registration_requires_ten_digit_phone() {
    let client = client();

    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "name": "Shortphone Vendor",
            "email": unique_email("shortphone"),
            "password": "integration-pass-1",
            "role": "vendor",
            "phone": "12345",
        }))
        .send()
        .await
        .expect("register request failed");

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("error response not JSON");
    assert_eq!(body["message"], "Phone number must be exactly 10 digits");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_role_gates_return_403_for_out_of_set_roles() {
    let client = client();
    let base = base_url();

    let customer = register(&client, "customer", "gatecheck").await;

    // Customer hitting a vendor endpoint.
    let resp = client
        .get(format!("{base}/api/products/my"))
        .bearer_auth(&customer.token)
        .send()
        .await
        .expect("vendor endpoint request failed");
    assert_eq!(resp.status(), 403);

    // Customer hitting an admin endpoint.
    let resp = client
        .get(format!("{base}/api/admin/users"))
        .bearer_auth(&customer.token)
        .send()
        .await
        .expect("admin endpoint request failed");
    assert_eq!(resp.status(), 403);
    let body: Value = resp.json().await.expect("error response not JSON");
    assert_eq!(body["message"], "Access denied for role: customer");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_missing_and_garbage_tokens_are_401() {
    let client = client();
    let base = base_url();

    let resp = client
        .get(format!("{base}/api/auth/me"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.expect("error response not JSON");
    assert_eq!(body["message"], "No token provided");

    let resp = client
        .get(format!("{base}/api/auth/me"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.expect("error response not JSON");
    assert_eq!(body["message"], "Invalid or expired token");
}
