//! Read-only reporting queries.
//!
//! These back the vendor dashboard and the admin sales report. Aggregation
//! happens database-side (GROUP BY / lateral latest-status lookup) instead of
//! loading the full order history per request.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use swiftcart_core::{DeliveryStatus, OrderId, OrderStatus, PaymentMethod, ProductId, UserId};

use super::RepositoryError;

/// Per-product sales line for the vendor summary.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductSales {
    pub product_id: ProductId,
    pub product_name: String,
    pub units_sold: i64,
    pub revenue: Decimal,
}

/// Revenue bucketed by calendar month.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyRevenue {
    /// Human label, e.g. "Jan 2026".
    pub month: String,
    pub revenue: Decimal,
}

/// Counts of deliveries by their latest timeline status.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatusDistribution {
    #[serde(rename = "Assigned")]
    pub assigned: i64,
    #[serde(rename = "Dispatched")]
    pub dispatched: i64,
    #[serde(rename = "In Transit")]
    pub in_transit: i64,
    #[serde(rename = "Delivered")]
    pub delivered: i64,
}

/// Everything the vendor dashboard shows at once.
#[derive(Debug, Clone, Serialize)]
pub struct VendorDashboard {
    pub product_count: i64,
    pub order_count: i64,
    pub items_sold: i64,
    pub total_revenue: Decimal,
    pub delivered_count: i64,
    pub monthly_order_stats: Vec<MonthlyRevenue>,
    pub order_status_distribution: StatusDistribution,
}

/// One row of the admin sales report.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: OrderId,
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    pub status: OrderStatus,
    pub customer_name: String,
    pub vendor_name: String,
    pub payment_method: PaymentMethod,
    pub agent_name: String,
}

/// Repository for reporting queries.
pub struct ReportsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportsRepository<'a> {
    /// Create a new reports repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Units sold and revenue per product for one vendor, optionally
    /// filtered by category.
    ///
    /// Revenue uses the unit price snapshotted at placement, so later price
    /// edits do not rewrite history. Items whose product was deleted are
    /// excluded, matching the per-product grouping.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn vendor_sales_summary(
        &self,
        vendor_id: UserId,
        category: Option<&str>,
    ) -> Result<Vec<ProductSales>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductSales>(
            "SELECT p.id AS product_id, p.name AS product_name,
                    SUM(i.qty)::BIGINT AS units_sold,
                    SUM(i.qty * i.unit_price) AS revenue
             FROM order_items i
             JOIN orders o ON o.id = i.order_id
             JOIN products p ON p.id = i.product_id
             WHERE o.vendor_id = $1 AND ($2::TEXT IS NULL OR p.category = $2)
             GROUP BY p.id, p.name
             ORDER BY revenue DESC",
        )
        .bind(vendor_id)
        .bind(category)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Monthly revenue series for one vendor, oldest month first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn vendor_monthly_revenue(
        &self,
        vendor_id: UserId,
    ) -> Result<Vec<MonthlyRevenue>, RepositoryError> {
        let rows: Vec<(DateTime<Utc>, Decimal)> = sqlx::query_as(
            "SELECT date_trunc('month', created_at) AS month, SUM(total) AS revenue
             FROM orders
             WHERE vendor_id = $1
             GROUP BY 1
             ORDER BY 1",
        )
        .bind(vendor_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(month, revenue)| MonthlyRevenue {
                month: month.format("%b %Y").to_string(),
                revenue,
            })
            .collect())
    }

    /// Full dashboard block for one vendor.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn vendor_dashboard(
        &self,
        vendor_id: UserId,
    ) -> Result<VendorDashboard, RepositoryError> {
        let (product_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM products WHERE vendor_id = $1")
                .bind(vendor_id)
                .fetch_one(self.pool)
                .await?;

        let (order_count, total_revenue): (i64, Decimal) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(total), 0) FROM orders WHERE vendor_id = $1",
        )
        .bind(vendor_id)
        .fetch_one(self.pool)
        .await?;

        let (items_sold,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(i.qty), 0)::BIGINT
             FROM order_items i
             JOIN orders o ON o.id = i.order_id
             WHERE o.vendor_id = $1",
        )
        .bind(vendor_id)
        .fetch_one(self.pool)
        .await?;

        let status_rows: Vec<(DeliveryStatus, i64)> = sqlx::query_as(
            "SELECT latest.status, COUNT(*)
             FROM deliveries d
             JOIN orders o ON o.id = d.order_id
             JOIN LATERAL (
                 SELECT status FROM delivery_updates
                 WHERE delivery_id = d.id
                 ORDER BY id DESC
                 LIMIT 1
             ) latest ON TRUE
             WHERE o.vendor_id = $1
             GROUP BY latest.status",
        )
        .bind(vendor_id)
        .fetch_all(self.pool)
        .await?;

        let mut distribution = StatusDistribution::default();
        for (status, count) in status_rows {
            match status {
                DeliveryStatus::Assigned => distribution.assigned = count,
                DeliveryStatus::Dispatched => distribution.dispatched = count,
                DeliveryStatus::InTransit => distribution.in_transit = count,
                DeliveryStatus::Delivered => distribution.delivered = count,
            }
        }

        let monthly_order_stats = self.vendor_monthly_revenue(vendor_id).await?;

        Ok(VendorDashboard {
            product_count,
            order_count,
            items_sold,
            total_revenue,
            delivered_count: distribution.delivered,
            monthly_order_stats,
            order_status_distribution: distribution,
        })
    }

    /// Admin-wide transaction listing, newest first.
    ///
    /// The agent is resolved through the paired delivery; orders without one
    /// read "Not Assigned".
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn admin_transactions(&self) -> Result<Vec<Transaction>, RepositoryError> {
        let rows = sqlx::query_as::<_, Transaction>(
            "SELECT o.id, o.created_at AS date, o.total AS amount, o.status,
                    c.name AS customer_name, v.name AS vendor_name,
                    o.payment_method,
                    COALESCE(a.name, 'Not Assigned') AS agent_name
             FROM orders o
             JOIN users c ON c.id = o.customer_id
             JOIN users v ON v.id = o.vendor_id
             LEFT JOIN deliveries d ON d.order_id = o.id
             LEFT JOIN users a ON a.id = d.agent_id
             ORDER BY o.created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}
