//! Order placement: the checkout fan-out.
//!
//! A checkout takes the selected cart lines, groups them by owning vendor,
//! and produces one order plus one delivery per vendor group. The whole
//! fan-out and the cart truncation run inside a single database transaction:
//! either every vendor's order exists and the purchased lines are gone, or
//! nothing changed. A concurrent checkout of the same lines loses the race
//! and sees them already removed.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use swiftcart_core::{PaymentMethod, ProductId, UserId};

use crate::db::users::UserRepository;
use crate::db::{RepositoryError, carts, deliveries, orders};
use crate::models::{CartLine, Order, OrderItem, ShippingInfo};

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines at all.
    #[error("cart is empty")]
    EmptyCart,

    /// None of the selected product IDs matched a live cart line.
    #[error("no valid selected items found in cart")]
    NoValidSelection,

    /// There is no delivery agent on record to assign.
    #[error("no delivery agent available")]
    NoAgentAvailable,

    /// Underlying repository error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// What the customer submits at checkout.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub payment_method: PaymentMethod,
    pub shipping: ShippingInfo,
    /// Product IDs in the cart the customer chose to buy now.
    pub selected_items: Vec<ProductId>,
}

/// One line of a planned order, with the product name captured from the
/// cart so invoices can be rendered without re-reading the products table.
#[derive(Debug, Clone)]
pub struct PlannedItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub qty: i32,
    pub unit_price: Decimal,
}

/// One vendor's share of a checkout, ready to insert.
#[derive(Debug, Clone)]
pub struct OrderPlan {
    pub vendor_id: UserId,
    pub items: Vec<PlannedItem>,
    pub total: Decimal,
}

/// A committed order together with the line items it was created from.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Filter cart lines to the selection and group them by vendor.
///
/// Lines whose product no longer resolves never reach this function (cart
/// reads inner-join products). Grouping uses a `BTreeMap` so the order of
/// created orders is deterministic across runs.
#[must_use]
pub fn plan_orders(lines: &[CartLine], selected: &HashSet<ProductId>) -> Vec<OrderPlan> {
    let mut groups: BTreeMap<UserId, OrderPlan> = BTreeMap::new();

    for line in lines {
        if !selected.contains(&line.product.id) {
            continue;
        }

        let plan = groups.entry(line.product.vendor_id).or_insert_with(|| OrderPlan {
            vendor_id: line.product.vendor_id,
            items: Vec::new(),
            total: Decimal::ZERO,
        });

        plan.items.push(PlannedItem {
            product_id: line.product.id,
            product_name: line.product.name.clone(),
            qty: line.qty,
            unit_price: line.product.price,
        });
        plan.total += line.product.price * Decimal::from(line.qty);
    }

    groups.into_values().collect()
}

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order: one order + one delivery per vendor represented in
    /// the selection, then remove the purchased lines from the cart.
    ///
    /// Returns the created orders in vendor-ID order, each paired with the
    /// line items it was built from so callers need no post-commit reads.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart`, `NoValidSelection`, or
    /// `NoAgentAvailable` before anything is written; any repository error
    /// aborts the transaction with no partial state.
    pub async fn place_order(
        &self,
        customer_id: UserId,
        request: CheckoutRequest,
    ) -> Result<Vec<PlacedOrder>, CheckoutError> {
        let cart = crate::db::carts::CartRepository::new(self.pool);
        let lines = cart.lines_for_user(customer_id).await?;
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let selected: HashSet<ProductId> = request.selected_items.iter().copied().collect();
        let plans = plan_orders(&lines, &selected);
        if plans.is_empty() {
            return Err(CheckoutError::NoValidSelection);
        }

        // First agent on record, by design. No balancing or region match.
        let agent = UserRepository::new(self.pool)
            .first_agent()
            .await?
            .ok_or(CheckoutError::NoAgentAvailable)?;

        let purchased: Vec<ProductId> = plans
            .iter()
            .flat_map(|p| p.items.iter().map(|i| i.product_id))
            .collect();

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let mut created = Vec::with_capacity(plans.len());
        for plan in &plans {
            let rows: Vec<orders::NewOrderItem> = plan
                .items
                .iter()
                .map(|i| orders::NewOrderItem {
                    product_id: i.product_id,
                    qty: i.qty,
                    unit_price: i.unit_price,
                })
                .collect();

            let order = orders::insert_order_tx(
                &mut tx,
                customer_id,
                plan.vendor_id,
                plan.total,
                request.payment_method,
                &request.shipping,
                &rows,
            )
            .await?;

            deliveries::insert_delivery_tx(&mut tx, order.id, agent.id).await?;

            let items = plan
                .items
                .iter()
                .map(|i| OrderItem {
                    product_id: i.product_id,
                    product_name: i.product_name.clone(),
                    qty: i.qty,
                    unit_price: i.unit_price,
                })
                .collect();
            created.push(PlacedOrder { order, items });
        }

        carts::remove_lines_tx(&mut tx, customer_id, &purchased).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(
            customer_id = %customer_id,
            orders = created.len(),
            agent_id = %agent.id,
            "checkout completed"
        );

        Ok(created)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::Product;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn line(product_id: i32, vendor_id: i32, price: Decimal, qty: i32) -> CartLine {
        CartLine {
            product: Product {
                id: ProductId::new(product_id),
                vendor_id: UserId::new(vendor_id),
                name: format!("product-{product_id}"),
                price,
                stock: 100,
                category: "misc".to_string(),
                description: String::new(),
                image_url: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            qty,
        }
    }

    fn ids(raw: &[i32]) -> HashSet<ProductId> {
        raw.iter().copied().map(ProductId::new).collect()
    }

    #[test]
    fn test_one_plan_per_vendor() {
        let lines = vec![
            line(1, 10, dec!(5.00), 2),
            line(2, 10, dec!(3.50), 1),
            line(3, 20, dec!(10.00), 3),
        ];

        let plans = plan_orders(&lines, &ids(&[1, 2, 3]));
        assert_eq!(plans.len(), 2);
    }

    #[test]
    fn test_totals_are_price_times_qty() {
        let lines = vec![line(1, 10, dec!(5.00), 2), line(2, 10, dec!(3.50), 1)];

        let plans = plan_orders(&lines, &ids(&[1, 2]));
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].total, dec!(13.50));
        assert_eq!(plans[0].items.len(), 2);
    }

    #[test]
    fn test_unselected_lines_are_ignored() {
        let lines = vec![
            line(1, 10, dec!(5.00), 2),
            line(2, 20, dec!(3.50), 1),
            line(3, 30, dec!(9.99), 1),
        ];

        let plans = plan_orders(&lines, &ids(&[2]));
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].vendor_id, UserId::new(20));
        assert_eq!(plans[0].total, dec!(3.50));
    }

    #[test]
    fn test_empty_selection_plans_nothing() {
        let lines = vec![line(1, 10, dec!(5.00), 2)];
        assert!(plan_orders(&lines, &HashSet::new()).is_empty());
    }

    #[test]
    fn test_selection_of_absent_products_plans_nothing() {
        let lines = vec![line(1, 10, dec!(5.00), 2)];
        assert!(plan_orders(&lines, &ids(&[99])).is_empty());
    }

    #[test]
    fn test_vendor_order_is_deterministic() {
        let lines = vec![
            line(1, 30, dec!(1.00), 1),
            line(2, 10, dec!(1.00), 1),
            line(3, 20, dec!(1.00), 1),
        ];

        let plans = plan_orders(&lines, &ids(&[1, 2, 3]));
        let vendors: Vec<i32> = plans.iter().map(|p| p.vendor_id.as_i32()).collect();
        assert_eq!(vendors, vec![10, 20, 30]);
    }

    #[test]
    fn test_planned_items_carry_the_product_name() {
        // Invoices are rendered from the plan after commit, so the name must
        // be captured here rather than re-read from the products table.
        let lines = vec![line(1, 10, dec!(5.00), 2), line(2, 10, dec!(3.00), 1)];
        let plans = plan_orders(&lines, &ids(&[1, 2]));
        let names: Vec<&str> = plans[0].items.iter().map(|i| i.product_name.as_str()).collect();
        assert_eq!(names, vec!["product-1", "product-2"]);
    }

    #[test]
    fn test_item_prices_are_snapshotted() {
        let lines = vec![line(1, 10, dec!(7.25), 4)];
        let plans = plan_orders(&lines, &ids(&[1]));
        assert_eq!(plans[0].items[0].unit_price, dec!(7.25));
        assert_eq!(plans[0].items[0].qty, 4);
        assert_eq!(plans[0].total, dec!(29.00));
    }
}
