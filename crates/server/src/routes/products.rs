//! Product catalog endpoints.
//!
//! Listing is public; everything else is vendor-gated and scoped to the
//! caller's own products.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use swiftcart_core::ProductId;

use crate::db::RepositoryError;
use crate::db::products::{NewProduct, ProductRepository, ProductUpdate};
use crate::error::{AppError, Result};
use crate::middleware::RequireVendor;
use crate::models::Product;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/my", get(my_products))
        .route("/upload", post(upload_image))
        .route("/{id}", put(update_product).delete(delete_product))
}

#[derive(Debug, Deserialize)]
struct CategoryFilter {
    category: Option<String>,
}

/// Create body with everything optional so missing fields produce the API's
/// own 400 instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
struct CreateProductBody {
    name: Option<String>,
    price: Option<Decimal>,
    stock: Option<i32>,
    category: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateProductBody {
    name: Option<String>,
    price: Option<Decimal>,
    stock: Option<i32>,
    category: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
}

#[derive(Debug, Serialize)]
struct UploadResponse {
    url: String,
}

async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<CategoryFilter>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool())
        .list(filter.category.as_deref())
        .await?;
    Ok(Json(products))
}

async fn create_product(
    RequireVendor(vendor): RequireVendor,
    State(state): State<AppState>,
    Json(body): Json<CreateProductBody>,
) -> Result<(StatusCode, Json<Product>)> {
    let (Some(name), Some(price), Some(stock), Some(category)) =
        (body.name, body.price, body.stock, body.category)
    else {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    };

    if price < Decimal::ZERO || stock < 0 {
        return Err(AppError::BadRequest(
            "Price and stock must be non-negative".to_string(),
        ));
    }

    let product = ProductRepository::new(state.pool())
        .create(
            vendor.id,
            NewProduct {
                name,
                price,
                stock,
                category,
                description: body.description.unwrap_or_default(),
                image_url: body.image_url,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

async fn my_products(
    RequireVendor(vendor): RequireVendor,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool())
        .list_for_vendor(vendor.id)
        .await?;
    Ok(Json(products))
}

async fn update_product(
    RequireVendor(vendor): RequireVendor,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(body): Json<UpdateProductBody>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .update_owned(
            id,
            vendor.id,
            ProductUpdate {
                name: body.name,
                price: body.price,
                stock: body.stock,
                category: body.category,
                description: body.description,
                image_url: body.image_url,
            },
        )
        .await
        .map_err(not_found_or_unauthorized)?;
    Ok(Json(product))
}

async fn delete_product(
    RequireVendor(vendor): RequireVendor,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>> {
    ProductRepository::new(state.pool())
        .delete_owned(id, vendor.id)
        .await
        .map_err(not_found_or_unauthorized)?;
    Ok(Json(json!({ "message": "Product deleted" })))
}

/// Accept a multipart `image` field and store it under the upload directory
/// with a generated name, returning the public URL.
async fn upload_image(
    RequireVendor(_vendor): RequireVendor,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::BadRequest("Invalid multipart payload".to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let extension = field
            .file_name()
            .and_then(|n| n.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_else(|| "bin".to_string());

        let bytes = field
            .bytes()
            .await
            .map_err(|_| AppError::BadRequest("Invalid multipart payload".to_string()))?;

        let filename = format!("{}.{extension}", uuid::Uuid::new_v4());
        let dir = state.config().upload_dir.clone();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Internal(format!("failed to create upload dir: {e}")))?;
        tokio::fs::write(dir.join(&filename), &bytes)
            .await
            .map_err(|e| AppError::Internal(format!("failed to write upload: {e}")))?;

        return Ok(Json(UploadResponse {
            url: format!("/uploads/{filename}"),
        }));
    }

    Err(AppError::BadRequest("No image file provided".to_string()))
}

/// Vendor-scoped lookups don't reveal whether the product exists at all.
fn not_found_or_unauthorized(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => {
            AppError::NotFound("Product not found or unauthorized".to_string())
        }
        other => AppError::Database(other),
    }
}
