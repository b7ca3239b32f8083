//! Delivery repository for database operations.
//!
//! Deliveries are created only inside the checkout transaction; status
//! updates are append-only rows in `delivery_updates`.

use sqlx::{PgPool, Postgres, Transaction};

use swiftcart_core::{DeliveryId, DeliveryStatus, OrderId, UserId};

use super::RepositoryError;
use crate::models::{
    AgentDelivery, Delivery, DeliveryProduct, DeliveryUpdate, OrderParty, ShippingRow,
};

/// Insert a delivery with its initial `Assigned` timeline entry.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if any insert fails.
pub async fn insert_delivery_tx(
    tx: &mut Transaction<'_, Postgres>,
    order_id: OrderId,
    agent_id: UserId,
) -> Result<Delivery, RepositoryError> {
    let delivery = sqlx::query_as::<_, Delivery>(
        "INSERT INTO deliveries (order_id, agent_id)
         VALUES ($1, $2)
         RETURNING id, order_id, agent_id, created_at",
    )
    .bind(order_id)
    .bind(agent_id)
    .fetch_one(&mut **tx)
    .await?;

    sqlx::query("INSERT INTO delivery_updates (delivery_id, status) VALUES ($1, $2)")
        .bind(delivery.id)
        .bind(DeliveryStatus::Assigned)
        .execute(&mut **tx)
        .await?;

    Ok(delivery)
}

/// Repository for delivery database operations.
pub struct DeliveryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DeliveryRepository<'a> {
    /// Create a new delivery repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a delivery, but only if the given agent is assigned to it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_agent(
        &self,
        id: DeliveryId,
        agent_id: UserId,
    ) -> Result<Option<Delivery>, RepositoryError> {
        let delivery = sqlx::query_as::<_, Delivery>(
            "SELECT id, order_id, agent_id, created_at
             FROM deliveries WHERE id = $1 AND agent_id = $2",
        )
        .bind(id)
        .bind(agent_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(delivery)
    }

    /// Get the delivery paired with an order, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_order(&self, order_id: OrderId) -> Result<Option<Delivery>, RepositoryError> {
        let delivery = sqlx::query_as::<_, Delivery>(
            "SELECT id, order_id, agent_id, created_at FROM deliveries WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(delivery)
    }

    /// The agent assigned to an order's delivery, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn agent_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Option<OrderParty>, RepositoryError> {
        let agent = sqlx::query_as::<_, OrderParty>(
            "SELECT u.id, u.name, u.email
             FROM deliveries d
             JOIN users u ON u.id = d.agent_id
             WHERE d.order_id = $1",
        )
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(agent)
    }

    /// The status timeline of a delivery, oldest entry first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn timeline(&self, id: DeliveryId) -> Result<Vec<DeliveryUpdate>, RepositoryError> {
        let updates = sqlx::query_as::<_, DeliveryUpdate>(
            "SELECT status, created_at FROM delivery_updates
             WHERE delivery_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;
        Ok(updates)
    }

    /// The timeline of the delivery paired with an order (empty if none).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn timeline_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<DeliveryUpdate>, RepositoryError> {
        let updates = sqlx::query_as::<_, DeliveryUpdate>(
            "SELECT u.status, u.created_at
             FROM delivery_updates u
             JOIN deliveries d ON d.id = u.delivery_id
             WHERE d.order_id = $1
             ORDER BY u.id",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;
        Ok(updates)
    }

    /// Append a status entry to the timeline and return the updated timeline.
    ///
    /// The append is unconditional beyond enum membership: duplicate or
    /// out-of-order entries are permitted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn append_status(
        &self,
        id: DeliveryId,
        status: DeliveryStatus,
    ) -> Result<Vec<DeliveryUpdate>, RepositoryError> {
        sqlx::query("INSERT INTO delivery_updates (delivery_id, status) VALUES ($1, $2)")
            .bind(id)
            .bind(status)
            .execute(self.pool)
            .await?;

        self.timeline(id).await
    }

    /// An agent's deliveries with order, customer, products, and timeline.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn list_for_agent(
        &self,
        agent_id: UserId,
    ) -> Result<Vec<AgentDelivery>, RepositoryError> {
        let rows = sqlx::query_as::<_, AgentDeliveryRow>(
            "SELECT d.id, d.order_id, o.total AS order_total,
                    u.id AS customer_id, u.name AS customer_name, u.email AS customer_email,
                    o.shipping_name, o.shipping_phone, o.shipping_address,
                    o.shipping_pin, o.shipping_state
             FROM deliveries d
             JOIN orders o ON o.id = d.order_id
             JOIN users u ON u.id = o.customer_id
             WHERE d.agent_id = $1
             ORDER BY d.created_at DESC",
        )
        .bind(agent_id)
        .fetch_all(self.pool)
        .await?;

        let mut deliveries = Vec::with_capacity(rows.len());
        for row in rows {
            let products = sqlx::query_as::<_, ProductLineRow>(
                "SELECT COALESCE(p.name, 'Unknown Product') AS name, i.qty
                 FROM order_items i
                 LEFT JOIN products p ON p.id = i.product_id
                 WHERE i.order_id = $1
                 ORDER BY i.product_id",
            )
            .bind(row.order_id)
            .fetch_all(self.pool)
            .await?;

            let status_updates = self.timeline(row.id).await?;

            deliveries.push(AgentDelivery {
                id: row.id,
                order_id: row.order_id,
                order_total: row.order_total,
                customer: OrderParty {
                    id: row.customer_id,
                    name: row.customer_name,
                    email: row.customer_email,
                },
                products: products
                    .into_iter()
                    .map(|p| DeliveryProduct {
                        name: p.name,
                        qty: p.qty,
                    })
                    .collect(),
                shipping_info: row.shipping,
                status_updates,
            });
        }

        Ok(deliveries)
    }
}

#[derive(sqlx::FromRow)]
struct AgentDeliveryRow {
    id: DeliveryId,
    order_id: OrderId,
    order_total: rust_decimal::Decimal,
    customer_id: UserId,
    customer_name: String,
    customer_email: String,
    #[sqlx(flatten)]
    shipping: ShippingRow,
}

#[derive(sqlx::FromRow)]
struct ProductLineRow {
    name: String,
    qty: i32,
}
