//! Application state shared across handlers.

use std::sync::Arc;

use jsonwebtoken::{DecodingKey, EncodingKey};
use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::services::payment::PaymentClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool, token keys, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    jwt_encoding_key: EncodingKey,
    jwt_decoding_key: DecodingKey,
    payment: Option<PaymentClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Token keys are derived once from the configured secret; the payment
    /// client is built only when gateway credentials are configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment gateway HTTP client cannot be built.
    pub fn new(config: ServerConfig, pool: PgPool) -> Result<Self, reqwest::Error> {
        let secret = config.jwt_secret.expose_secret().as_bytes();
        let jwt_encoding_key = EncodingKey::from_secret(secret);
        let jwt_decoding_key = DecodingKey::from_secret(secret);

        let payment = config
            .payment
            .as_ref()
            .map(PaymentClient::new)
            .transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                jwt_encoding_key,
                jwt_decoding_key,
                payment,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the key used to sign bearer tokens.
    #[must_use]
    pub fn jwt_encoding_key(&self) -> &EncodingKey {
        &self.inner.jwt_encoding_key
    }

    /// Get the key used to verify bearer tokens.
    #[must_use]
    pub fn jwt_decoding_key(&self) -> &DecodingKey {
        &self.inner.jwt_decoding_key
    }

    /// Get the payment gateway client, if configured.
    #[must_use]
    pub fn payment(&self) -> Option<&PaymentClient> {
        self.inner.payment.as_ref()
    }
}
