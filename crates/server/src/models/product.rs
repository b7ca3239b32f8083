//! Product domain type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use swiftcart_core::{ProductId, UserId};

/// A product owned by exactly one vendor.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: ProductId,
    pub vendor_id: UserId,
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: String,
    pub description: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
