//! Authentication endpoints: register, login, federated login, profile.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use swiftcart_core::Role;

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{User, UserSummary};
use crate::services::auth::Registration;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/google", post(google_login))
        .route("/me", get(me))
}

#[derive(Debug, Deserialize)]
struct RegisterBody {
    name: String,
    email: String,
    password: String,
    #[serde(default)]
    role: Option<Role>,
    phone: Option<String>,
    region: Option<String>,
    address: Option<String>,
    place: Option<String>,
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct GoogleLoginBody {
    email: String,
    name: String,
}

/// `{ user, token }` as returned by register/login/google.
#[derive(Debug, Serialize)]
struct AuthResponse {
    user: UserSummary,
    token: String,
}

impl AuthResponse {
    fn new(user: &User, token: String) -> Self {
        Self {
            user: UserSummary::from(user),
            token,
        }
    }
}

async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let (user, token) = super::auth_service(&state)
        .register(Registration {
            name: body.name,
            email: body.email,
            password: body.password,
            role: body.role.unwrap_or(Role::Customer),
            phone: body.phone,
            region: body.region,
            address: body.address,
            place: body.place,
            category: body.category,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse::new(&user, token))))
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<AuthResponse>> {
    let (user, token) = super::auth_service(&state)
        .login(&body.email, &body.password)
        .await?;
    Ok(Json(AuthResponse::new(&user, token)))
}

async fn google_login(
    State(state): State<AppState>,
    Json(body): Json<GoogleLoginBody>,
) -> Result<Json<AuthResponse>> {
    let (user, token) = super::auth_service(&state)
        .federated_login(&body.email, &body.name)
        .await?;
    Ok(Json(AuthResponse::new(&user, token)))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
