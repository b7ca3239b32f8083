//! Database operations for the SwiftCart `PostgreSQL` database.
//!
//! # Tables
//!
//! - `users` - All roles: customers, vendors, agents, admins
//! - `products` - Vendor-owned catalog
//! - `cart_items` - One logical cart per user
//! - `orders` / `order_items` - Per-vendor checkout snapshots
//! - `deliveries` / `delivery_updates` - 1:1 with orders, append-only timeline
//! - `wishlist_items` - Unique (user, product) pairs
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p swiftcart-cli -- migrate
//! ```
//!
//! Queries use the sqlx runtime API (`query_as`/`bind`) rather than the
//! compile-time macros so the workspace builds without a live database.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub mod carts;
pub mod deliveries;
pub mod orders;
pub mod products;
pub mod reports;
pub mod users;
pub mod wishlists;

/// Errors that can occur during repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("{0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a sqlx error to `Conflict` when it is a unique violation.
pub(crate) fn conflict_on_unique(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}
