//! Cart domain types.
//!
//! A cart is the set of `cart_items` rows for one user. Lines whose product
//! has been deleted disappear from reads via the join; there is no separate
//! cart document to go stale.

use serde::Serialize;

use super::Product;

/// One cart line with its product populated.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub product: Product,
    pub qty: i32,
}

/// A user's cart as returned by the API.
#[derive(Debug, Clone, Serialize, Default)]
pub struct Cart {
    pub items: Vec<CartLine>,
}
