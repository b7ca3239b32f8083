//! Cart endpoints (customer role).

use axum::extract::{Path, State};
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use swiftcart_core::ProductId;

use crate::db::RepositoryError;
use crate::db::carts::CartRepository;
use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireCustomer;
use crate::models::Cart;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart).post(add_to_cart))
        .route("/item/{product_id}", delete(remove_from_cart))
        .route("/clear", delete(clear_cart))
}

#[derive(Debug, Deserialize)]
struct AddToCartBody {
    product_id: ProductId,
    qty: i32,
}

#[derive(Debug, Serialize)]
struct RemoveResponse {
    message: String,
    cart: Cart,
}

async fn get_cart(
    RequireCustomer(customer): RequireCustomer,
    State(state): State<AppState>,
) -> Result<Json<Cart>> {
    let items = CartRepository::new(state.pool())
        .lines_for_user(customer.id)
        .await?;
    Ok(Json(Cart { items }))
}

/// Add a line or overwrite its quantity if the product is already carted.
async fn add_to_cart(
    RequireCustomer(customer): RequireCustomer,
    State(state): State<AppState>,
    Json(body): Json<AddToCartBody>,
) -> Result<Json<Cart>> {
    if body.qty < 1 {
        return Err(AppError::BadRequest(
            "Invalid product or quantity".to_string(),
        ));
    }

    let product = ProductRepository::new(state.pool()).get(body.product_id).await?;
    if product.is_none() {
        return Err(AppError::BadRequest(
            "Invalid product or quantity".to_string(),
        ));
    }

    let cart = CartRepository::new(state.pool());
    cart.upsert(customer.id, body.product_id, body.qty).await?;

    let items = cart.lines_for_user(customer.id).await?;
    Ok(Json(Cart { items }))
}

async fn remove_from_cart(
    RequireCustomer(customer): RequireCustomer,
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<RemoveResponse>> {
    let cart = CartRepository::new(state.pool());
    cart.remove(customer.id, product_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::NotFound("Product not found in cart".to_string())
            }
            other => AppError::Database(other),
        })?;

    let items = cart.lines_for_user(customer.id).await?;
    Ok(Json(RemoveResponse {
        message: "Item removed from cart".to_string(),
        cart: Cart { items },
    }))
}

async fn clear_cart(
    RequireCustomer(customer): RequireCustomer,
    State(state): State<AppState>,
) -> Result<Json<Value>> {
    CartRepository::new(state.pool()).clear(customer.id).await?;
    Ok(Json(json!({ "message": "Cart cleared" })))
}
