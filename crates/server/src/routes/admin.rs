//! Admin endpoints: user management and the sales report.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use swiftcart_core::{Email, Role, UserId};

use crate::db::RepositoryError;
use crate::db::reports::{ReportsRepository, Transaction};
use crate::db::users::{NewUser, UserRepository, UserUpdate};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::User;
use crate::services::auth::hash_password;
use crate::state::AppState;

/// Password assigned to admin-created vendor accounts; vendors are expected
/// to change it after first login.
const DEFAULT_VENDOR_PASSWORD: &str = "vendor123";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(all_users))
        .route("/customers", get(all_customers))
        .route("/customers/{id}", axum::routing::delete(delete_customer))
        .route("/vendors", get(all_vendors).post(create_vendor))
        .route(
            "/vendors/{id}",
            axum::routing::put(update_vendor).delete(delete_vendor),
        )
        .route("/agents", get(all_agents).post(create_agent))
        .route(
            "/agents/{id}",
            axum::routing::put(update_agent).delete(delete_agent),
        )
        .route("/transactions", get(all_transactions))
}

#[derive(Debug, Deserialize)]
struct CreateVendorBody {
    name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
    place: Option<String>,
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateAgentBody {
    name: String,
    email: String,
    password: String,
    phone: Option<String>,
    region: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateUserBody {
    name: Option<String>,
    phone: Option<String>,
    region: Option<String>,
    address: Option<String>,
    place: Option<String>,
    category: Option<String>,
}

impl From<UpdateUserBody> for UserUpdate {
    fn from(body: UpdateUserBody) -> Self {
        Self {
            name: body.name,
            phone: body.phone,
            region: body.region,
            address: body.address,
            place: body.place,
            category: body.category,
        }
    }
}

async fn all_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool()).list(None).await?;
    Ok(Json(users))
}

async fn all_customers(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool())
        .list(Some(Role::Customer))
        .await?;
    Ok(Json(users))
}

async fn delete_customer(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<Value>> {
    UserRepository::new(state.pool())
        .delete(id, Role::Customer)
        .await
        .map_err(|e| role_not_found(e, "Customer not found"))?;
    Ok(Json(json!({ "message": "Customer deleted" })))
}

async fn all_vendors(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool())
        .list(Some(Role::Vendor))
        .await?;
    Ok(Json(users))
}

async fn create_vendor(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CreateVendorBody>,
) -> Result<(StatusCode, Json<User>)> {
    let email =
        Email::parse(&body.email).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let vendor = UserRepository::new(state.pool())
        .create(NewUser {
            name: body.name,
            email,
            password_hash: hash_password(DEFAULT_VENDOR_PASSWORD)?,
            role: Role::Vendor,
            phone: body.phone,
            region: None,
            address: body.address,
            place: body.place,
            category: body.category,
        })
        .await
        .map_err(|e| exists_as_bad_request(e, "Vendor already exists"))?;

    Ok((StatusCode::CREATED, Json(vendor)))
}

async fn update_vendor(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(body): Json<UpdateUserBody>,
) -> Result<Json<User>> {
    let vendor = UserRepository::new(state.pool())
        .update(id, Role::Vendor, body.into())
        .await
        .map_err(|e| role_not_found(e, "Vendor not found"))?;
    Ok(Json(vendor))
}

async fn delete_vendor(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<Value>> {
    UserRepository::new(state.pool())
        .delete(id, Role::Vendor)
        .await
        .map_err(|e| role_not_found(e, "Vendor not found"))?;
    Ok(Json(json!({ "message": "Vendor deleted" })))
}

async fn all_agents(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool())
        .list(Some(Role::Agent))
        .await?;
    Ok(Json(users))
}

async fn create_agent(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CreateAgentBody>,
) -> Result<(StatusCode, Json<Value>)> {
    let email =
        Email::parse(&body.email).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let agent = UserRepository::new(state.pool())
        .create(NewUser {
            name: body.name,
            email,
            password_hash: hash_password(&body.password)?,
            role: Role::Agent,
            phone: body.phone,
            region: body.region,
            address: None,
            place: None,
            category: None,
        })
        .await
        .map_err(|e| exists_as_bad_request(e, "Agent already exists"))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Agent created", "agent": agent })),
    ))
}

async fn update_agent(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(body): Json<UpdateUserBody>,
) -> Result<Json<User>> {
    let agent = UserRepository::new(state.pool())
        .update(id, Role::Agent, body.into())
        .await
        .map_err(|e| role_not_found(e, "Agent not found"))?;
    Ok(Json(agent))
}

async fn delete_agent(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<Value>> {
    UserRepository::new(state.pool())
        .delete(id, Role::Agent)
        .await
        .map_err(|e| role_not_found(e, "Agent not found"))?;
    Ok(Json(json!({ "message": "Agent deleted" })))
}

async fn all_transactions(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Transaction>>> {
    let transactions = ReportsRepository::new(state.pool())
        .admin_transactions()
        .await?;
    Ok(Json(transactions))
}

/// Duplicate email on admin-side creation surfaces as a 400.
fn exists_as_bad_request(err: RepositoryError, message: &str) -> AppError {
    match err {
        RepositoryError::Conflict(_) => AppError::BadRequest(message.to_string()),
        other => AppError::Database(other),
    }
}

fn role_not_found(err: RepositoryError, message: &str) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound(message.to_string()),
        other => AppError::Database(other),
    }
}
