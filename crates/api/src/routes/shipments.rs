//! Shipment endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use common::OrderCode;
use serde::{Deserialize, Serialize};
use store::Store;

use crate::AppState;
use crate::error::ApiError;
use crate::routes::ApiResponse;

#[derive(Deserialize)]
pub struct CreateShipmentRequest {
    pub order: String,
    pub start_address: String,
    pub end_address: String,
}

#[derive(Serialize)]
pub struct ShipmentResponse {
    pub code: String,
    pub order: String,
    pub start_address: String,
    pub end_address: String,
}

/// GET /shipments — list every recorded shipment.
#[tracing::instrument(skip(state))]
pub async fn list<S: Store + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<ApiResponse>, ApiError> {
    let shipments: Vec<ShipmentResponse> = state
        .store
        .list_shipments()
        .await?
        .into_iter()
        .map(|shipment| ShipmentResponse {
            code: shipment.code.to_string(),
            order: shipment.order_code.to_string(),
            start_address: shipment.start_address,
            end_address: shipment.end_address,
        })
        .collect();

    Ok(Json(ApiResponse::with_data(
        "Shipment list",
        serde_json::json!({ "shipments": shipments }),
    )))
}

/// POST /shipments — record a shipment against an order.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: Store + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateShipmentRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    let uuid = uuid::Uuid::parse_str(req.order.trim())
        .map_err(|_| ApiError::BadRequest("Order code is invalid".to_string()))?;
    if req.start_address.trim().is_empty() || req.end_address.trim().is_empty() {
        return Err(ApiError::BadRequest("Shipment address is invalid".to_string()));
    }

    let shipment = state
        .shipment_recorder
        .add_shipment(OrderCode::from_uuid(uuid), &req.start_address, &req.end_address)
        .await?;

    metrics::counter!("shipments_recorded_total").increment(1);
    Ok(Json(ApiResponse::with_data(
        "Shipment added successfully",
        serde_json::json!({ "shipment": { "code": shipment.code.to_string() } }),
    )))
}
