//! Payment settlement endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use common::OrderCode;
use serde::Deserialize;
use store::Store;

use crate::AppState;
use crate::error::ApiError;
use crate::routes::ApiResponse;

#[derive(Deserialize)]
pub struct CreatePaymentRequest {
    pub orders: Vec<OrderRefRequest>,
    pub payment_amount: f64,
}

#[derive(Deserialize)]
pub struct OrderRefRequest {
    pub code: String,
}

/// POST /payments — allocate one payment across the named orders.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: Store + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreatePaymentRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    if req.orders.is_empty() {
        return Err(ApiError::BadRequest("Payment has no orders".to_string()));
    }

    let mut codes = Vec::with_capacity(req.orders.len());
    for order in &req.orders {
        let uuid = uuid::Uuid::parse_str(order.code.trim())
            .map_err(|_| ApiError::BadRequest("Order code is invalid".to_string()))?;
        codes.push(OrderCode::from_uuid(uuid));
    }

    state
        .payment_allocator
        .pay(&codes, req.payment_amount)
        .await?;

    metrics::counter!("payments_recorded_total").increment(1);
    Ok(Json(ApiResponse::message("Payment added successfully")))
}
