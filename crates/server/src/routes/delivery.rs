//! Delivery endpoints (agent role).

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use swiftcart_core::{DeliveryId, DeliveryStatus};

use crate::db::deliveries::DeliveryRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAgent;
use crate::models::{AgentDelivery, DeliveryUpdate};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assigned_deliveries))
        .route("/{id}/status", put(update_status))
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    status: String,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    message: String,
    status_updates: Vec<DeliveryUpdate>,
}

async fn assigned_deliveries(
    RequireAgent(agent): RequireAgent,
    State(state): State<AppState>,
) -> Result<Json<Vec<AgentDelivery>>> {
    let deliveries = DeliveryRepository::new(state.pool())
        .list_for_agent(agent.id)
        .await?;
    Ok(Json(deliveries))
}

/// Append a status to the delivery's timeline.
///
/// The status string must be one of the four known values; anything else is
/// a 400 with no write. Beyond that the append is unconditional.
async fn update_status(
    RequireAgent(agent): RequireAgent,
    State(state): State<AppState>,
    Path(id): Path<DeliveryId>,
    Json(body): Json<StatusBody>,
) -> Result<Json<StatusResponse>> {
    let status = DeliveryStatus::from_str(&body.status)
        .map_err(|_| AppError::BadRequest("Invalid status value".to_string()))?;

    let repo = DeliveryRepository::new(state.pool());
    repo.get_for_agent(id, agent.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Delivery not found or unauthorized".to_string()))?;

    let status_updates = repo.append_status(id, status).await?;

    Ok(Json(StatusResponse {
        message: format!("Status updated to '{status}'"),
        status_updates,
    }))
}
