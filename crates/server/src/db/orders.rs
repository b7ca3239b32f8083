//! Order repository for database operations.
//!
//! Order creation only ever happens inside the checkout transaction, so the
//! write paths here take a `Transaction` rather than the pool.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use swiftcart_core::{OrderId, PaymentMethod, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItem, OrderParty, ShippingInfo};

const ORDER_COLUMNS: &str = "id, customer_id, vendor_id, total, status, payment_method, \
     shipping_name, shipping_phone, shipping_address, shipping_pin, shipping_state, created_at";

/// One line to snapshot into `order_items`.
#[derive(Debug, Clone, Copy)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub qty: i32,
    pub unit_price: Decimal,
}

/// Insert one order and its item snapshots inside the checkout transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if any insert fails.
pub async fn insert_order_tx(
    tx: &mut Transaction<'_, Postgres>,
    customer_id: UserId,
    vendor_id: UserId,
    total: Decimal,
    payment_method: PaymentMethod,
    shipping: &ShippingInfo,
    items: &[NewOrderItem],
) -> Result<Order, RepositoryError> {
    let sql = format!(
        "INSERT INTO orders (customer_id, vendor_id, total, payment_method,
                             shipping_name, shipping_phone, shipping_address,
                             shipping_pin, shipping_state)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING {ORDER_COLUMNS}"
    );
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(customer_id)
        .bind(vendor_id)
        .bind(total)
        .bind(payment_method)
        .bind(&shipping.name)
        .bind(&shipping.phone)
        .bind(&shipping.address)
        .bind(&shipping.pin)
        .bind(&shipping.state)
        .fetch_one(&mut **tx)
        .await?;

    for item in items {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, qty, unit_price)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(order.id)
        .bind(item.product_id)
        .bind(item.qty)
        .bind(item.unit_price)
        .execute(&mut **tx)
        .await?;
    }

    Ok(order)
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(order)
    }

    /// Items of an order, with the product name resolved at read time.
    ///
    /// Products can be deleted after an order is placed; such lines read back
    /// as "Unknown Product" with their snapshotted price intact.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT i.product_id,
                    COALESCE(p.name, 'Unknown Product') AS product_name,
                    i.qty, i.unit_price
             FROM order_items i
             LEFT JOIN products p ON p.id = i.product_id
             WHERE i.order_id = $1
             ORDER BY i.product_id",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;
        Ok(items)
    }

    /// A customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_customer(&self, customer_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = $1 ORDER BY created_at DESC"
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(customer_id)
            .fetch_all(self.pool)
            .await?;
        Ok(orders)
    }

    /// A vendor's orders with the purchasing customer, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_vendor(
        &self,
        vendor_id: UserId,
    ) -> Result<Vec<(Order, OrderParty)>, RepositoryError> {
        let rows = sqlx::query_as::<_, VendorOrderRow>(
            "SELECT o.id, o.customer_id, o.vendor_id, o.total, o.status, o.payment_method,
                    o.shipping_name, o.shipping_phone, o.shipping_address,
                    o.shipping_pin, o.shipping_state, o.created_at,
                    u.id AS customer_user_id, u.name AS customer_name, u.email AS customer_email
             FROM orders o
             JOIN users u ON u.id = o.customer_id
             WHERE o.vendor_id = $1
             ORDER BY o.created_at DESC",
        )
        .bind(vendor_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                let customer = OrderParty {
                    id: r.customer_user_id,
                    name: r.customer_name,
                    email: r.customer_email,
                };
                (r.order, customer)
            })
            .collect())
    }
}

#[derive(sqlx::FromRow)]
struct VendorOrderRow {
    #[sqlx(flatten)]
    order: Order,
    customer_user_id: UserId,
    customer_name: String,
    customer_email: String,
}
