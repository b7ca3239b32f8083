//! User roles.

use serde::{Deserialize, Serialize};

/// Role of a SwiftCart user.
///
/// Every endpoint group is gated on a fixed set of roles. The role is carried
/// in the bearer token but re-checked against the user record on every
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Shopper: browses products, owns a cart and wishlist, places orders.
    #[default]
    Customer,
    /// Seller: owns products and receives one order per checkout that
    /// included their items.
    Vendor,
    /// Delivery agent: fulfills deliveries and appends timeline updates.
    Agent,
    /// Back-office administrator.
    Admin,
}

impl Role {
    /// Whether users with this role must register a 10-digit phone number.
    #[must_use]
    pub const fn requires_phone(self) -> bool {
        matches!(self, Self::Vendor | Self::Agent)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Vendor => write!(f, "vendor"),
            Self::Agent => write!(f, "agent"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "vendor" => Ok(Self::Vendor),
            "agent" => Ok(Self::Agent),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Customer, Role::Vendor, Role::Agent, Role::Admin] {
            assert_eq!(Role::from_str(&role.to_string()), Ok(role));
        }
    }

    #[test]
    fn test_role_json_uses_lowercase() {
        assert_eq!(
            serde_json::to_string(&Role::Vendor).expect("serialize"),
            "\"vendor\""
        );
    }

    #[test]
    fn test_phone_requirement() {
        assert!(Role::Vendor.requires_phone());
        assert!(Role::Agent.requires_phone());
        assert!(!Role::Customer.requires_phone());
        assert!(!Role::Admin.requires_phone());
    }
}
