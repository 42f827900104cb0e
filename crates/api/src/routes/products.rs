//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::ProductCategory;
use domain::ProductInput;
use serde::{Deserialize, Serialize};
use store::Store;

use crate::AppState;
use crate::error::ApiError;
use crate::routes::{ApiResponse, MAX_CODE_LEN};

/// Field-level limits enforced before the core is called.
const MAX_NAME_LEN: usize = 30;
const MAX_DESCRIPTION_LEN: usize = 100;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub category: i16,
    pub price: i64,
    pub units: i64,
}

#[derive(Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: i16,
    pub price: i64,
    pub units: i64,
}

// -- Response types --

#[derive(Serialize)]
pub struct ProductResponse {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub category: i16,
    pub price: i64,
    pub units: i64,
}

fn validate_fields(
    code: &str,
    name: &str,
    description: &Option<String>,
    category: i16,
    price: i64,
    units: i64,
) -> Result<(), ApiError> {
    if code.trim().is_empty() || code.len() > MAX_CODE_LEN {
        return Err(ApiError::BadRequest("Product code is invalid".to_string()));
    }
    if name.trim().is_empty() || name.len() > MAX_NAME_LEN {
        return Err(ApiError::BadRequest("Product name is invalid".to_string()));
    }
    if let Some(description) = description
        && description.len() > MAX_DESCRIPTION_LEN
    {
        return Err(ApiError::BadRequest(
            "Product description is too long".to_string(),
        ));
    }
    if ProductCategory::from_value(category).is_none() {
        return Err(ApiError::BadRequest(format!(
            "Category must be a valid value => {:?}",
            ProductCategory::VALID_VALUES
        )));
    }
    if price < 0 {
        return Err(ApiError::BadRequest("Product price is invalid".to_string()));
    }
    if units < 0 {
        return Err(ApiError::BadRequest("Product units are invalid".to_string()));
    }
    Ok(())
}

// -- Handlers --

/// GET /products — list every product with its stock units.
#[tracing::instrument(skip(state))]
pub async fn list<S: Store + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<ApiResponse>, ApiError> {
    let products: Vec<ProductResponse> = state
        .store
        .list_products()
        .await?
        .into_iter()
        .map(|(product, stock)| ProductResponse {
            code: product.code,
            name: product.name,
            description: product.description,
            category: product.category.value(),
            price: product.price,
            units: stock.units,
        })
        .collect();

    Ok(Json(ApiResponse::with_data(
        "Product list",
        serde_json::json!({ "products": products }),
    )))
}

/// POST /products — create a product with its stock quantity.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: Store + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateProductRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    validate_fields(
        &req.code,
        &req.name,
        &req.description,
        req.category,
        req.price,
        req.units,
    )?;

    state
        .catalog
        .add_product(ProductInput::new(
            req.code,
            req.name,
            req.category,
            req.price,
            req.units,
            req.description,
        ))
        .await?;

    metrics::counter!("products_created_total").increment(1);
    Ok(Json(ApiResponse::message("Product added successfully")))
}

/// PUT /products/{code} — overwrite a product's fields and stock units.
#[tracing::instrument(skip(state, req))]
pub async fn update<S: Store + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(code): Path<String>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    validate_fields(
        &code,
        &req.name,
        &req.description,
        req.category,
        req.price,
        req.units,
    )?;

    state
        .catalog
        .update_product(ProductInput::new(
            code,
            req.name,
            req.category,
            req.price,
            req.units,
            req.description,
        ))
        .await?;

    Ok(Json(ApiResponse::message("Product updated successfully")))
}

/// DELETE /products/{code} — remove a product and its stock.
#[tracing::instrument(skip(state))]
pub async fn destroy<S: Store + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse>, ApiError> {
    state.catalog.delete_product(&code).await?;
    Ok(Json(ApiResponse::message("Product removed successfully")))
}
