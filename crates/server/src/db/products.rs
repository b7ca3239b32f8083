//! Product repository for database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;

use swiftcart_core::{ProductId, UserId};

use super::RepositoryError;
use crate::models::Product;

const PRODUCT_COLUMNS: &str =
    "id, vendor_id, name, price, stock, category, description, image_url, created_at, updated_at";

/// Fields for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: String,
    pub description: String,
    pub image_url: Option<String>,
}

/// Partial product update. `None` keeps the column.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products, optionally filtered by category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, RepositoryError> {
        let products = match category {
            Some(category) => {
                let sql = format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products WHERE category = $1 ORDER BY created_at DESC"
                );
                sqlx::query_as::<_, Product>(&sql)
                    .bind(category)
                    .fetch_all(self.pool)
                    .await?
            }
            None => {
                let sql =
                    format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC");
                sqlx::query_as::<_, Product>(&sql)
                    .fetch_all(self.pool)
                    .await?
            }
        };
        Ok(products)
    }

    /// List a vendor's products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_vendor(&self, vendor_id: UserId) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE vendor_id = $1 ORDER BY created_at DESC"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(vendor_id)
            .fetch_all(self.pool)
            .await?;
        Ok(products)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(product)
    }

    /// Create a product owned by the given vendor.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails (including
    /// check-constraint violations on negative price/stock).
    pub async fn create(
        &self,
        vendor_id: UserId,
        new_product: NewProduct,
    ) -> Result<Product, RepositoryError> {
        let sql = format!(
            "INSERT INTO products (vendor_id, name, price, stock, category, description, image_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {PRODUCT_COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(vendor_id)
            .bind(&new_product.name)
            .bind(new_product.price)
            .bind(new_product.stock)
            .bind(&new_product.category)
            .bind(&new_product.description)
            .bind(&new_product.image_url)
            .fetch_one(self.pool)
            .await?;
        Ok(product)
    }

    /// Update a product, but only if the given vendor owns it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist or
    /// belongs to another vendor. Returns `RepositoryError::Database` if the
    /// query fails.
    pub async fn update_owned(
        &self,
        id: ProductId,
        vendor_id: UserId,
        update: ProductUpdate,
    ) -> Result<Product, RepositoryError> {
        let sql = format!(
            "UPDATE products
             SET name = COALESCE($3, name),
                 price = COALESCE($4, price),
                 stock = COALESCE($5, stock),
                 category = COALESCE($6, category),
                 description = COALESCE($7, description),
                 image_url = COALESCE($8, image_url),
                 updated_at = now()
             WHERE id = $1 AND vendor_id = $2
             RETURNING {PRODUCT_COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(vendor_id)
            .bind(&update.name)
            .bind(update.price)
            .bind(update.stock)
            .bind(&update.category)
            .bind(&update.description)
            .bind(&update.image_url)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product, but only if the given vendor owns it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist or
    /// belongs to another vendor. Returns `RepositoryError::Database` if the
    /// query fails.
    pub async fn delete_owned(&self, id: ProductId, vendor_id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1 AND vendor_id = $2")
            .bind(id)
            .bind(vendor_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
