//! Order creation endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use domain::OrderLine;
use serde::Deserialize;
use store::Store;

use crate::AppState;
use crate::error::ApiError;
use crate::routes::{ApiResponse, MAX_CODE_LEN};

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub products: Vec<OrderLineRequest>,
}

#[derive(Deserialize)]
pub struct OrderLineRequest {
    pub code: String,
    pub units: i64,
}

/// POST /orders — create an order, reserving stock for every line.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: Store + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    if req.products.is_empty() {
        return Err(ApiError::BadRequest("Order has no products".to_string()));
    }
    for line in &req.products {
        if line.code.trim().is_empty() || line.code.len() > MAX_CODE_LEN {
            return Err(ApiError::BadRequest("Product code is invalid".to_string()));
        }
        if line.units < 0 {
            return Err(ApiError::BadRequest("Units is invalid".to_string()));
        }
    }

    let lines: Vec<OrderLine> = req
        .products
        .into_iter()
        .map(|line| OrderLine::new(line.code, line.units))
        .collect();

    let order = state.order_engine.create_order(&lines).await?;

    metrics::counter!("orders_created_total").increment(1);
    Ok(Json(ApiResponse::with_data(
        "Order added successfully",
        serde_json::json!({
            "order": {
                "code": order.code.to_string(),
                "state": order.state.value(),
                "total": order.total,
            }
        }),
    )))
}
