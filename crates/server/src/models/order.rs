//! Order domain types.
//!
//! An order is the snapshot of one vendor's share of a single checkout.
//! `status` is set to `Ordered` at placement and never advanced; live
//! fulfillment state is the paired delivery's timeline.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use swiftcart_core::{OrderId, OrderStatus, PaymentMethod, ProductId, UserId};

use super::delivery::DeliveryUpdate;

/// Denormalized shipping fields captured at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub pin: String,
    pub state: String,
}

/// An order for one vendor's items within a single checkout.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: UserId,
    pub vendor_id: UserId,
    pub total: Decimal,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    #[sqlx(flatten)]
    #[serde(rename = "shipping_info")]
    pub shipping: ShippingRow,
    pub created_at: DateTime<Utc>,
}

/// Shipping columns as stored (prefixed in the table, flattened here).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ShippingRow {
    #[serde(rename = "name")]
    pub shipping_name: String,
    #[serde(rename = "phone")]
    pub shipping_phone: String,
    #[serde(rename = "address")]
    pub shipping_address: String,
    #[serde(rename = "pin")]
    pub shipping_pin: String,
    #[serde(rename = "state")]
    pub shipping_state: String,
}

/// One order line with its price snapshotted at placement.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
    pub product_id: ProductId,
    /// Product name at read time; "Unknown Product" if since deleted.
    pub product_name: String,
    pub qty: i32,
    pub unit_price: Decimal,
}

/// A party (customer/vendor/agent) named on an order listing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderParty {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// An order joined with its items and delivery state for listings.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithDelivery {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub delivery_agent: Option<OrderParty>,
    pub delivery_timeline: Vec<DeliveryUpdate>,
}
