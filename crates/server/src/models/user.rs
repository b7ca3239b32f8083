//! User domain type.
//!
//! The password hash never lives on this struct; repositories that need it
//! for verification return it separately so it cannot leak into a response.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use swiftcart_core::{Email, Role, UserId};

/// A SwiftCart user of any role.
///
/// Role-specific optional fields: `region` is set for agents,
/// `address`/`place`/`category` for vendors, `phone` for both.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub phone: Option<String>,
    pub region: Option<String>,
    pub address: Option<String>,
    pub place: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of a user embedded in auth responses (`{ user, token }`).
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub phone: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            phone: user.phone.clone(),
        }
    }
}
