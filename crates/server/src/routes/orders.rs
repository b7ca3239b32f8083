//! Order endpoints: placement, listings, invoices, vendor reports.

use std::path::PathBuf;

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use swiftcart_core::{OrderId, PaymentMethod, ProductId};

use crate::db::deliveries::DeliveryRepository;
use crate::db::orders::OrderRepository;
use crate::db::reports::{MonthlyRevenue, ProductSales, ReportsRepository, VendorDashboard};
use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::{CurrentUser, RequireCustomer, RequireVendor};
use crate::models::{Order, OrderItem, OrderParty, OrderWithDelivery, ShippingInfo, User};
use crate::services::checkout::{CheckoutError, CheckoutRequest, CheckoutService};
use crate::services::invoice;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(place_order))
        .route("/my", get(my_orders))
        .route("/vendor", get(vendor_orders))
        .route("/invoice/{id}", get(download_invoice))
        .route("/vendor/sales-summary", get(vendor_sales_summary))
        .route("/vendor/revenue-chart", get(vendor_revenue_chart))
        .route("/vendor/dashboard-stats", get(vendor_dashboard_stats))
}

#[derive(Debug, Deserialize)]
struct PlaceOrderBody {
    payment_method: PaymentMethod,
    shipping_info: ShippingInfo,
    selected_items: Vec<ProductId>,
}

#[derive(Debug, Serialize)]
struct PlaceOrderResponse {
    message: String,
    orders: Vec<Order>,
}

/// A vendor's order listing row: the order with its purchaser and delivery.
#[derive(Debug, Serialize)]
struct VendorOrder {
    #[serde(flatten)]
    order: Order,
    customer: OrderParty,
    items: Vec<OrderItem>,
    delivery_agent: Option<OrderParty>,
    delivery_timeline: Vec<crate::models::DeliveryUpdate>,
}

#[derive(Debug, Deserialize)]
struct CategoryFilter {
    category: Option<String>,
}

/// `labels`/`data` pair for the revenue chart widget.
#[derive(Debug, Serialize)]
struct RevenueChart {
    labels: Vec<String>,
    data: Vec<Decimal>,
}

async fn place_order(
    RequireCustomer(customer): RequireCustomer,
    State(state): State<AppState>,
    Json(body): Json<PlaceOrderBody>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>)> {
    let placed = CheckoutService::new(state.pool())
        .place_order(
            customer.id,
            CheckoutRequest {
                payment_method: body.payment_method,
                shipping: body.shipping_info,
                selected_items: body.selected_items,
            },
        )
        .await
        .map_err(map_checkout_error)?;

    // Invoices are rendered from the committed plan, after commit; a failed
    // write only costs a warn, the download endpoint regenerates missing
    // files.
    for placed_order in &placed {
        write_invoice(
            state.config().invoice_dir.clone(),
            placed_order.order.clone(),
            placed_order.items.clone(),
            customer.name.clone(),
        )
        .await;
    }

    let orders = placed.into_iter().map(|p| p.order).collect();
    Ok((
        StatusCode::CREATED,
        Json(PlaceOrderResponse {
            message: "Order placed successfully".to_string(),
            orders,
        }),
    ))
}

async fn my_orders(
    RequireCustomer(customer): RequireCustomer,
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderWithDelivery>>> {
    let repo = OrderRepository::new(state.pool());
    let deliveries = DeliveryRepository::new(state.pool());

    let orders = repo.list_for_customer(customer.id).await?;
    let mut out = Vec::with_capacity(orders.len());
    for order in orders {
        let items = repo.items(order.id).await?;
        let delivery_agent = deliveries.agent_for_order(order.id).await?;
        let delivery_timeline = deliveries.timeline_for_order(order.id).await?;
        out.push(OrderWithDelivery {
            order,
            items,
            delivery_agent,
            delivery_timeline,
        });
    }
    Ok(Json(out))
}

async fn vendor_orders(
    RequireVendor(vendor): RequireVendor,
    State(state): State<AppState>,
) -> Result<Json<Vec<VendorOrder>>> {
    let repo = OrderRepository::new(state.pool());
    let deliveries = DeliveryRepository::new(state.pool());

    let orders = repo.list_for_vendor(vendor.id).await?;
    let mut out = Vec::with_capacity(orders.len());
    for (order, customer) in orders {
        let items = repo.items(order.id).await?;
        let delivery_agent = deliveries.agent_for_order(order.id).await?;
        let delivery_timeline = deliveries.timeline_for_order(order.id).await?;
        out.push(VendorOrder {
            order,
            customer,
            items,
            delivery_agent,
            delivery_timeline,
        });
    }
    Ok(Json(out))
}

/// Stream the invoice PDF for an order the caller is party to.
async fn download_invoice(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<([(header::HeaderName, String); 2], Vec<u8>)> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    let deliveries = DeliveryRepository::new(state.pool());
    let agent = deliveries.agent_for_order(id).await?;

    let is_party = user.id == order.customer_id
        || user.id == order.vendor_id
        || agent.as_ref().is_some_and(|a| a.id == user.id);
    if !is_party {
        return Err(AppError::Forbidden(
            "Unauthorized to access this invoice".to_string(),
        ));
    }

    let path = invoice::invoice_path(&state.config().invoice_dir, id);
    if !path.exists() {
        let items = repo.items(id).await?;
        let customer = UserRepository::new(state.pool())
            .get_by_id(order.customer_id)
            .await?;
        regenerate_invoice(state.config().invoice_dir.clone(), order, items, customer).await?;
    }

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| AppError::Internal(format!("failed to read invoice: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"invoice-{id}.pdf\""),
            ),
        ],
        bytes,
    ))
}

async fn vendor_sales_summary(
    RequireVendor(vendor): RequireVendor,
    State(state): State<AppState>,
    Query(filter): Query<CategoryFilter>,
) -> Result<Json<Vec<ProductSales>>> {
    let summary = ReportsRepository::new(state.pool())
        .vendor_sales_summary(vendor.id, filter.category.as_deref())
        .await?;
    Ok(Json(summary))
}

async fn vendor_revenue_chart(
    RequireVendor(vendor): RequireVendor,
    State(state): State<AppState>,
) -> Result<Json<RevenueChart>> {
    let rows = ReportsRepository::new(state.pool())
        .vendor_monthly_revenue(vendor.id)
        .await?;

    let (labels, data) = rows
        .into_iter()
        .map(|MonthlyRevenue { month, revenue }| (month, revenue))
        .unzip();
    Ok(Json(RevenueChart { labels, data }))
}

async fn vendor_dashboard_stats(
    RequireVendor(vendor): RequireVendor,
    State(state): State<AppState>,
) -> Result<Json<VendorDashboard>> {
    let dashboard = ReportsRepository::new(state.pool())
        .vendor_dashboard(vendor.id)
        .await?;
    Ok(Json(dashboard))
}

fn map_checkout_error(err: CheckoutError) -> AppError {
    match err {
        CheckoutError::EmptyCart => AppError::BadRequest("Cart is empty".to_string()),
        CheckoutError::NoValidSelection => {
            AppError::BadRequest("No valid selected items found in cart".to_string())
        }
        CheckoutError::NoAgentAvailable => {
            AppError::BadRequest("No delivery agent available".to_string())
        }
        CheckoutError::Repository(e) => AppError::Database(e),
    }
}

/// Render an invoice on the blocking pool; failure is logged, not returned.
async fn write_invoice(dir: PathBuf, order: Order, items: Vec<OrderItem>, customer_name: String) {
    let order_id = order.id;
    let result =
        tokio::task::spawn_blocking(move || invoice::generate_invoice(&dir, &order, &items, &customer_name))
            .await;

    match result {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => tracing::warn!(%order_id, error = %e, "invoice generation failed"),
        Err(e) => tracing::warn!(%order_id, error = %e, "invoice task panicked"),
    }
}

/// Regenerate a missing invoice before a download; here failure is an error
/// because the caller is waiting on the file.
async fn regenerate_invoice(
    dir: PathBuf,
    order: Order,
    items: Vec<OrderItem>,
    customer: Option<User>,
) -> Result<()> {
    let name = customer.map_or_else(|| "Customer".to_string(), |c| c.name);
    tokio::task::spawn_blocking(move || invoice::generate_invoice(&dir, &order, &items, &name))
        .await
        .map_err(|e| AppError::Internal(format!("invoice task panicked: {e}")))?
        .map_err(|e| AppError::Internal(format!("invoice generation failed: {e}")))?;
    Ok(())
}
