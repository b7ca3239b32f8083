//! Payment gateway client.
//!
//! Thin HTTP client over the gateway's order API (Razorpay-compatible).
//! The server only creates gateway orders; the browser completes payment
//! against the gateway directly using the public key ID, so the gateway's
//! response JSON is relayed to the client untouched.

use reqwest::Client;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use secrecy::ExposeSecret;
use serde::Serialize;
use thiserror::Error;

use crate::config::PaymentConfig;

/// Errors from the payment gateway client.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Amount does not convert to a whole number of minor currency units.
    #[error("amount not representable in minor units: {0}")]
    AmountOutOfRange(Decimal),

    /// Transport-level failure talking to the gateway.
    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The gateway answered with a non-success status.
    #[error("gateway returned {status}: {body}")]
    Gateway {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    /// Amount in minor units (paise).
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

/// Client for the payment gateway's REST API.
pub struct PaymentClient {
    http: Client,
    key_id: String,
    key_secret: String,
    base_url: String,
}

impl PaymentClient {
    /// Build a client from the configured gateway credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &PaymentConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()?;

        Ok(Self {
            http,
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.expose_secret().to_owned(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// The public key ID the browser needs to open the gateway widget.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Create a gateway order for `amount` (major units, INR).
    ///
    /// Returns the gateway's response body verbatim; the client-side SDK
    /// consumes it as-is.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::AmountOutOfRange` if the amount has sub-paise
    /// precision or overflows, `Transport` on network failure, and `Gateway`
    /// when the gateway rejects the request.
    pub async fn create_order(
        &self,
        amount: Decimal,
        receipt: &str,
    ) -> Result<serde_json::Value, PaymentError> {
        let minor = to_minor_units(amount).ok_or(PaymentError::AmountOutOfRange(amount))?;

        let response = self
            .http
            .post(format!("{}/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&CreateOrderBody {
                amount: minor,
                currency: "INR",
                receipt,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "payment gateway rejected order creation");
            return Err(PaymentError::Gateway { status, body });
        }

        Ok(response.json().await?)
    }
}

/// Convert a major-unit amount to whole minor units (x100).
///
/// Returns `None` when the amount has more than two decimal places or does
/// not fit in an `i64`.
fn to_minor_units(amount: Decimal) -> Option<i64> {
    let scaled = amount.checked_mul(Decimal::ONE_HUNDRED)?;
    if scaled.fract() != Decimal::ZERO {
        return None;
    }
    scaled.to_i64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_minor_units_conversion() {
        assert_eq!(to_minor_units(dec!(499.50)), Some(49950));
        assert_eq!(to_minor_units(dec!(0.01)), Some(1));
        assert_eq!(to_minor_units(dec!(100)), Some(10000));
    }

    #[test]
    fn test_minor_units_rejects_sub_paise() {
        assert_eq!(to_minor_units(dec!(1.005)), None);
    }

    #[test]
    fn test_minor_units_zero() {
        assert_eq!(to_minor_units(Decimal::ZERO), Some(0));
    }
}
