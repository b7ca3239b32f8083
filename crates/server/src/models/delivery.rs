//! Delivery domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use swiftcart_core::{DeliveryId, DeliveryStatus, OrderId, UserId};

use super::order::{OrderParty, ShippingRow};

/// A delivery record, 1:1 with an order.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Delivery {
    pub id: DeliveryId,
    pub order_id: OrderId,
    pub agent_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// One entry in a delivery's append-only status timeline.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DeliveryUpdate {
    pub status: DeliveryStatus,
    #[sqlx(rename = "created_at")]
    pub timestamp: DateTime<Utc>,
}

/// One product line shown to the agent (name and quantity only).
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryProduct {
    pub name: String,
    pub qty: i32,
}

/// An agent's view of one assigned delivery: the order, who it goes to,
/// what is in it, and the status timeline so far.
#[derive(Debug, Clone, Serialize)]
pub struct AgentDelivery {
    pub id: DeliveryId,
    pub order_id: OrderId,
    pub order_total: rust_decimal::Decimal,
    pub customer: OrderParty,
    pub products: Vec<DeliveryProduct>,
    pub shipping_info: ShippingRow,
    pub status_updates: Vec<DeliveryUpdate>,
}
