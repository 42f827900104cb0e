//! Order engine: stock-reserving order creation.
//!
//! The engine fetches the stock rows for the requested products, runs
//! the pure [`plan_order`] computation, and commits the resulting
//! change-set in one atomic step. Validation and stock decrements live
//! entirely in [`plan_order`], so the business rules are testable
//! without any store.

use serde::{Deserialize, Serialize};
use store::{ChangeSet, Order, OrderDetail, Product, Stock, Store};

use crate::error::{DomainError, Result};

/// One requested order line: a product code and the units wanted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub code: String,
    pub units: i64,
}

impl OrderLine {
    pub fn new(code: impl Into<String>, units: i64) -> Self {
        Self {
            code: code.into(),
            units,
        }
    }
}

/// The writes an order creation will perform, computed before any of
/// them is applied.
#[derive(Debug, Clone)]
pub struct OrderPlan {
    pub order: Order,
    pub details: Vec<OrderDetail>,
    pub stock_updates: Vec<Stock>,
}

/// Validates an order request against the fetched stock rows and
/// computes the order, its line items, and the decremented stocks.
///
/// Duplicate product codes within one request are rejected outright
/// rather than merged; a request is one line per product.
pub fn plan_order(stocks: Vec<(Product, Stock)>, requested: &[OrderLine]) -> Result<OrderPlan> {
    for (i, line) in requested.iter().enumerate() {
        if requested[..i].iter().any(|l| l.code == line.code) {
            return Err(DomainError::Validation(
                "duplicate product codes in order request".to_string(),
            ));
        }
    }

    if stocks.len() != requested.len() {
        return Err(DomainError::Validation(
            "some product codes do not exist".to_string(),
        ));
    }

    let mut order = Order::new();
    let mut order_total = 0.0;
    let mut details = Vec::with_capacity(stocks.len());
    let mut stock_updates = Vec::with_capacity(stocks.len());

    for (product, mut stock) in stocks {
        let units = requested
            .iter()
            .find(|l| l.code == product.code)
            .map(|l| l.units)
            .ok_or_else(|| {
                DomainError::Validation(
                    "some product does not have stock units configured".to_string(),
                )
            })?;

        if !stock.has_enough_units(units) {
            return Err(DomainError::Validation(format!(
                "product {} does not have enough stock",
                product.code
            )));
        }

        order_total += units as f64 * product.price as f64;
        details.push(OrderDetail::new(
            order.code,
            product.code.clone(),
            units,
            product.price,
        ));
        stock.units -= units;
        stock.touch();
        stock_updates.push(stock);
    }

    order.total = order_total;

    Ok(OrderPlan {
        order,
        details,
        stock_updates,
    })
}

/// Service creating orders that reserve stock.
pub struct OrderEngine<S: Store> {
    store: S,
}

impl<S: Store> OrderEngine<S> {
    /// Creates a new order engine over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates an order from the requested lines, decrementing each
    /// product's stock. All-or-nothing: any invalid line fails the whole
    /// request with no stock mutated.
    #[tracing::instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn create_order(&self, items: &[OrderLine]) -> Result<Order> {
        let codes: Vec<String> = items.iter().map(|line| line.code.clone()).collect();
        let stocks = self
            .store
            .stocks_for_products(&codes)
            .await
            .map_err(commit_failure)?;

        let plan = plan_order(stocks, items)?;
        let order = plan.order.clone();

        let changes = ChangeSet::new()
            .insert_order(plan.order)
            .insert_order_details(plan.details)
            .update_stocks(plan.stock_updates);

        self.store.commit(changes).await.map_err(commit_failure)?;

        Ok(order)
    }
}

fn commit_failure(e: store::StoreError) -> DomainError {
    tracing::error!(error = %e, "error creating an order");
    DomainError::Validation("error creating an order".to_string())
}
