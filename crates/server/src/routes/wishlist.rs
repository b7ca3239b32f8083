//! Wishlist endpoints (any authenticated user).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use swiftcart_core::{ProductId, WishlistItemId};

use crate::db::RepositoryError;
use crate::db::carts::CartRepository;
use crate::db::products::ProductRepository;
use crate::db::wishlists::{WishlistEntry, WishlistRepository};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_wishlist).post(add_to_wishlist))
        .route("/{id}", delete(remove_from_wishlist))
}

#[derive(Debug, Deserialize)]
struct AddBody {
    product_id: Option<ProductId>,
}

async fn get_wishlist(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<WishlistEntry>>> {
    let entries = WishlistRepository::new(state.pool()).list(user.id).await?;
    Ok(Json(entries))
}

/// Add a product; a product already in the caller's cart is rejected, as is
/// a duplicate wishlist entry.
async fn add_to_wishlist(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<AddBody>,
) -> Result<(StatusCode, Json<Value>)> {
    let Some(product_id) = body.product_id else {
        return Err(AppError::BadRequest("Product ID is required".to_string()));
    };

    ProductRepository::new(state.pool())
        .get(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    if CartRepository::new(state.pool())
        .contains(user.id, product_id)
        .await?
    {
        return Err(AppError::BadRequest("Already in cart".to_string()));
    }

    WishlistRepository::new(state.pool())
        .insert(user.id, product_id)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => {
                AppError::BadRequest("Already in wishlist".to_string())
            }
            other => AppError::Database(other),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Added to wishlist" })),
    ))
}

async fn remove_from_wishlist(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<WishlistItemId>,
) -> Result<Json<Value>> {
    WishlistRepository::new(state.pool())
        .delete_owned(id, user.id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::NotFound("Item not found or unauthorized".to_string())
            }
            other => AppError::Database(other),
        })?;

    Ok(Json(json!({ "message": "Item removed from wishlist" })))
}
