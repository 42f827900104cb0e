//! HTTP API server with observability for the order-management core.
//!
//! Provides REST endpoints for products, orders, payments, and
//! shipments, with structured logging (tracing) and Prometheus metrics.
//! Handlers validate primitive input, call one domain operation, and
//! render the result as a `{message, data?}` envelope.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use domain::{Catalog, OrderEngine, PaymentAllocator, ShipmentRecorder};
use metrics_exporter_prometheus::PrometheusHandle;
use store::Store;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state accessible from all handlers.
pub struct AppState<S: Store> {
    pub catalog: Catalog<S>,
    pub order_engine: OrderEngine<S>,
    pub payment_allocator: PaymentAllocator<S>,
    pub shipment_recorder: ShipmentRecorder<S>,
    pub store: S,
}

/// Creates the application state with one service per domain operation
/// group, all sharing the given store.
pub fn create_state<S: Store + Clone>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState {
        catalog: Catalog::new(store.clone()),
        order_engine: OrderEngine::new(store.clone()),
        payment_allocator: PaymentAllocator::new(store.clone()),
        shipment_recorder: ShipmentRecorder::new(store.clone()),
        store,
    })
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: Store + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/products", get(routes::products::list::<S>))
        .route("/products", post(routes::products::create::<S>))
        .route("/products/{code}", put(routes::products::update::<S>))
        .route("/products/{code}", delete(routes::products::destroy::<S>))
        .route("/orders", post(routes::orders::create::<S>))
        .route("/payments", post(routes::payments::create::<S>))
        .route("/shipments", get(routes::shipments::list::<S>))
        .route("/shipments", post(routes::shipments::create::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
