//! Cart repository for database operations.
//!
//! Cart reads join `products`, so lines whose product was deleted simply
//! never surface. Repeat adds overwrite the quantity rather than increment.

use sqlx::{PgPool, Postgres, Transaction};

use swiftcart_core::{ProductId, UserId};

use super::RepositoryError;
use crate::models::{CartLine, Product};

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load a user's cart lines with products populated, oldest line first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines_for_user(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            "SELECT p.id, p.vendor_id, p.name, p.price, p.stock, p.category,
                    p.description, p.image_url, p.created_at, p.updated_at,
                    c.qty
             FROM cart_items c
             JOIN products p ON p.id = c.product_id
             WHERE c.user_id = $1
             ORDER BY c.added_at",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| CartLine {
                product: r.product,
                qty: r.qty,
            })
            .collect())
    }

    /// Add a product to the cart, or overwrite its quantity if present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails (including
    /// foreign-key violations for unknown products).
    pub async fn upsert(
        &self,
        user_id: UserId,
        product_id: ProductId,
        qty: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO cart_items (user_id, product_id, qty)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id, product_id) DO UPDATE SET qty = EXCLUDED.qty",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(qty)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Remove one product from the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product was not in the cart.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(&self, user_id: UserId, product_id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Truncate the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Whether the cart contains a product (used by the wishlist gate).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn contains(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let row: Option<(i32,)> =
            sqlx::query_as("SELECT 1 FROM cart_items WHERE user_id = $1 AND product_id = $2")
                .bind(user_id)
                .bind(product_id)
                .fetch_optional(self.pool)
                .await?;
        Ok(row.is_some())
    }
}

/// Remove the purchased lines inside the checkout transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn remove_lines_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: UserId,
    product_ids: &[ProductId],
) -> Result<(), RepositoryError> {
    let ids: Vec<i32> = product_ids.iter().map(|p| p.as_i32()).collect();
    sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = ANY($2)")
        .bind(user_id)
        .bind(&ids)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[derive(sqlx::FromRow)]
struct CartLineRow {
    #[sqlx(flatten)]
    product: Product,
    qty: i32,
}
