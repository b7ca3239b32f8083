//! Status and payment enums.
//!
//! Wire values match the original SwiftCart API: title-cased strings,
//! including the two-word `"In Transit"`. Database enum labels use the same
//! spelling so rows read back without mapping tables.

use serde::{Deserialize, Serialize};

/// Fulfillment progress of a delivery.
///
/// Deliveries carry an append-only timeline of these values. The intended
/// progression is `Assigned` → `Dispatched` → `In Transit` → `Delivered`,
/// but the append itself is unguarded beyond enum membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "delivery_status"))]
pub enum DeliveryStatus {
    #[default]
    Assigned,
    Dispatched,
    #[serde(rename = "In Transit")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "In Transit"))]
    InTransit,
    Delivered,
}

impl DeliveryStatus {
    /// All valid statuses, in intended timeline order.
    pub const ALL: [Self; 4] = [
        Self::Assigned,
        Self::Dispatched,
        Self::InTransit,
        Self::Delivered,
    ];
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assigned => write!(f, "Assigned"),
            Self::Dispatched => write!(f, "Dispatched"),
            Self::InTransit => write!(f, "In Transit"),
            Self::Delivered => write!(f, "Delivered"),
        }
    }
}

impl std::str::FromStr for DeliveryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Assigned" => Ok(Self::Assigned),
            "Dispatched" => Ok(Self::Dispatched),
            "In Transit" => Ok(Self::InTransit),
            "Delivered" => Ok(Self::Delivered),
            _ => Err(format!("invalid delivery status: {s}")),
        }
    }
}

/// Coarse status stored on the order itself.
///
/// Set to `Ordered` at placement and never advanced; live fulfillment state
/// is the paired delivery's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "order_status"))]
pub enum OrderStatus {
    #[default]
    Ordered,
    Dispatched,
    #[serde(rename = "In Transit")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "In Transit"))]
    InTransit,
    Delivered,
}

/// How an order was paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "payment_method"))]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cash,
    /// Paid through the hosted payment gateway.
    Online,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_delivery_status_round_trip() {
        for status in DeliveryStatus::ALL {
            assert_eq!(DeliveryStatus::from_str(&status.to_string()), Ok(status));
        }
    }

    #[test]
    fn test_in_transit_wire_format_has_space() {
        let json = serde_json::to_string(&DeliveryStatus::InTransit).expect("serialize");
        assert_eq!(json, "\"In Transit\"");

        let back: DeliveryStatus = serde_json::from_str("\"In Transit\"").expect("deserialize");
        assert_eq!(back, DeliveryStatus::InTransit);
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(DeliveryStatus::from_str("Shipped").is_err());
        assert!(DeliveryStatus::from_str("assigned").is_err());
        assert!(DeliveryStatus::from_str("").is_err());
    }

    #[test]
    fn test_payment_method_wire_format() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Cash).expect("serialize"),
            "\"Cash\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Online).expect("serialize"),
            "\"Online\""
        );
    }
}
