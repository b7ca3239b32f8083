//! Wishlist repository for database operations.

use sqlx::PgPool;

use swiftcart_core::{ProductId, UserId, WishlistItemId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::Product;

/// One wishlist entry with its product populated.
#[derive(Debug, Clone, serde::Serialize)]
pub struct WishlistEntry {
    pub id: WishlistItemId,
    pub product: Product,
}

/// Repository for wishlist database operations.
pub struct WishlistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WishlistRepository<'a> {
    /// Create a new wishlist repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// A user's wishlist with products populated, newest first.
    ///
    /// Product deletion cascades to wishlist rows, so no dangling entries
    /// can surface here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<WishlistEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, WishlistRow>(
            "SELECT w.id AS wishlist_id,
                    p.id, p.vendor_id, p.name, p.price, p.stock, p.category,
                    p.description, p.image_url, p.created_at, p.updated_at
             FROM wishlist_items w
             JOIN products p ON p.id = w.product_id
             WHERE w.user_id = $1
             ORDER BY w.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| WishlistEntry {
                id: r.wishlist_id,
                product: r.product,
            })
            .collect())
    }

    /// Insert a (user, product) pair.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` ("Already in wishlist") if the
    /// pair exists. Returns `RepositoryError::Database` for other failures.
    pub async fn insert(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<WishlistItemId, RepositoryError> {
        let row: (WishlistItemId,) = sqlx::query_as(
            "INSERT INTO wishlist_items (user_id, product_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Already in wishlist"))?;
        Ok(row.0)
    }

    /// Delete an entry, but only if the given user owns it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no matching entry exists.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_owned(
        &self,
        id: WishlistItemId,
        user_id: UserId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM wishlist_items WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct WishlistRow {
    wishlist_id: WishlistItemId,
    #[sqlx(flatten)]
    product: Product,
}
