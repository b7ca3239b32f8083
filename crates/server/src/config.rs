//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SWIFTCART_DATABASE_URL` - `PostgreSQL` connection string
//! - `SWIFTCART_JWT_SECRET` - Bearer-token signing secret (min 32 chars)
//!
//! ## Optional
//! - `SWIFTCART_HOST` - Bind address (default: 127.0.0.1)
//! - `SWIFTCART_PORT` - Listen port (default: 5050)
//! - `SWIFTCART_INVOICE_DIR` - Directory for generated invoice PDFs (default: invoices)
//! - `SWIFTCART_UPLOAD_DIR` - Directory for uploaded product images (default: uploads)
//! - `PAYMENT_KEY_ID` - Payment gateway key ID (gateway checkout disabled if unset)
//! - `PAYMENT_KEY_SECRET` - Payment gateway key secret
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "insert",
    "enter-",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// SwiftCart server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Bearer-token signing secret
    pub jwt_secret: SecretString,
    /// Directory where invoice PDFs are written
    pub invoice_dir: PathBuf,
    /// Directory where uploaded product images are stored
    pub upload_dir: PathBuf,
    /// Payment gateway configuration (None disables gateway checkout)
    pub payment: Option<PaymentConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Payment gateway credentials.
///
/// Implements `Debug` manually to redact the key secret.
#[derive(Clone)]
pub struct PaymentConfig {
    /// Gateway key ID (safe to expose to the browser)
    pub key_id: String,
    /// Gateway key secret (server-side only)
    pub key_secret: SecretString,
    /// Gateway API base URL
    pub base_url: String,
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the JWT secret fails validation (length, placeholder detection).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = SecretString::from(get_required_env("SWIFTCART_DATABASE_URL")?);
        let host = get_env_or_default("SWIFTCART_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SWIFTCART_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SWIFTCART_PORT", "5050")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SWIFTCART_PORT".to_string(), e.to_string()))?;

        let jwt_secret = SecretString::from(get_required_env("SWIFTCART_JWT_SECRET")?);
        validate_secret(&jwt_secret, "SWIFTCART_JWT_SECRET")?;

        let invoice_dir = PathBuf::from(get_env_or_default("SWIFTCART_INVOICE_DIR", "invoices"));
        let upload_dir = PathBuf::from(get_env_or_default("SWIFTCART_UPLOAD_DIR", "uploads"));

        let payment = PaymentConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            invoice_dir,
            upload_dir,
            payment,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl PaymentConfig {
    /// Load gateway credentials if both halves are present.
    ///
    /// A key ID without a secret (or vice versa) is a configuration mistake
    /// and fails loudly rather than silently disabling payments.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let key_id = get_optional_env("PAYMENT_KEY_ID");
        let key_secret = get_optional_env("PAYMENT_KEY_SECRET");

        match (key_id, key_secret) {
            (Some(key_id), Some(key_secret)) => Ok(Some(Self {
                key_id,
                key_secret: SecretString::from(key_secret),
                base_url: get_env_or_default("PAYMENT_BASE_URL", "https://api.razorpay.com/v1"),
            })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::MissingEnvVar(
                "PAYMENT_KEY_SECRET".to_string(),
            )),
            (None, Some(_)) => Err(ConfigError::MissingEnvVar("PAYMENT_KEY_ID".to_string())),
        }
    }
}

/// Validate a signing secret: length and placeholder checks.
fn validate_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();

    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("must be at least {MIN_JWT_SECRET_LENGTH} characters"),
        ));
    }

    let lowered = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lowered.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("looks like a placeholder (contains {pattern:?})"),
            ));
        }
    }

    Ok(())
}

fn get_required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn get_optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn get_env_or_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_secret_rejects_short() {
        let secret = SecretString::from("short");
        assert!(matches!(
            validate_secret(&secret, "TEST"),
            Err(ConfigError::InsecureSecret(_, _))
        ));
    }

    #[test]
    fn test_validate_secret_rejects_placeholder() {
        let secret = SecretString::from("your-signing-key-goes-right-here-ok");
        assert!(matches!(
            validate_secret(&secret, "TEST"),
            Err(ConfigError::InsecureSecret(_, _))
        ));
    }

    #[test]
    fn test_validate_secret_accepts_random() {
        let secret = SecretString::from("kP9mQ2vX8nL4jR7tW1bY5cA3dF6gH0sZ");
        assert!(validate_secret(&secret, "TEST").is_ok());
    }
}
