//! HTTP route handlers.
//!
//! One module per API area, each exposing a `router()` that the main router
//! nests under `/api/<area>`. Handlers return `Result<_, AppError>` and stay
//! thin: parse, authorize, call a repository or service, shape the response.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod delivery;
pub mod orders;
pub mod payment;
pub mod products;
pub mod wishlist;

use axum::Router;

use crate::services::auth::AuthService;
use crate::state::AppState;

/// The `/api` router with every area nested.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/products", products::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
        .nest("/delivery", delivery::router())
        .nest("/admin", admin::router())
        .nest("/wishlist", wishlist::router())
        .nest("/payment", payment::router())
}

/// Build an [`AuthService`] borrowing the shared state.
pub(crate) fn auth_service(state: &AppState) -> AuthService<'_> {
    AuthService::new(
        state.pool(),
        state.jwt_encoding_key(),
        state.jwt_decoding_key(),
    )
}
