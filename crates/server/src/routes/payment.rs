//! Payment gateway endpoint.
//!
//! Creates a gateway order the browser SDK completes payment against. The
//! gateway's JSON response is relayed verbatim.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::middleware::RequireCustomer;
use crate::services::payment::PaymentError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/order", post(create_payment_order))
}

#[derive(Debug, Deserialize)]
struct CreateOrderBody {
    /// Amount in major currency units (rupees).
    amount: Decimal,
}

async fn create_payment_order(
    RequireCustomer(_customer): RequireCustomer,
    State(state): State<AppState>,
    Json(body): Json<CreateOrderBody>,
) -> Result<Json<Value>> {
    let client = state
        .payment()
        .ok_or_else(|| AppError::Internal("payment gateway not configured".to_string()))?;

    let receipt = format!("rcpt_{}", Utc::now().timestamp_millis());
    let response = client
        .create_order(body.amount, &receipt)
        .await
        .map_err(|e| match e {
            PaymentError::AmountOutOfRange(_) => {
                AppError::BadRequest("Invalid amount".to_string())
            }
            other => AppError::Internal(format!("payment order failed: {other}")),
        })?;

    Ok(Json(response))
}
