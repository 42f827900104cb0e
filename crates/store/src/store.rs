use async_trait::async_trait;
use common::OrderCode;

use crate::{
    ChangeSet, Result,
    entities::{Order, OrderDetail, Product, Shipment, Stock},
};

/// Core trait for storage implementations.
///
/// Fetches are plain reads; all writes go through [`commit`], which
/// applies a whole [`ChangeSet`] atomically — either every write lands or
/// none do. Implementations must be thread-safe (Send + Sync).
///
/// Batch fetches return rows in primary-key order, which for both bundled
/// implementations is insertion order. The domain layer relies on this
/// when allocating a payment across multiple orders.
///
/// [`commit`]: Store::commit
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetches a product by its code.
    async fn product(&self, code: &str) -> Result<Option<Product>>;

    /// Fetches a product together with its stock row.
    ///
    /// Returns None if no stock row exists for the code.
    async fn stock_with_product(&self, code: &str) -> Result<Option<(Product, Stock)>>;

    /// Batch-fetches the stock rows (with their products) for a set of
    /// product codes. Codes without a stock row are silently absent from
    /// the result; callers compare counts to detect them.
    async fn stocks_for_products(&self, codes: &[String]) -> Result<Vec<(Product, Stock)>>;

    /// Lists every product with its stock row.
    async fn list_products(&self) -> Result<Vec<(Product, Stock)>>;

    /// Fetches an order by its code.
    async fn order(&self, code: OrderCode) -> Result<Option<Order>>;

    /// Batch-fetches orders by code, unrestricted by state.
    async fn orders_by_codes(&self, codes: &[OrderCode]) -> Result<Vec<Order>>;

    /// Fetches the line items of an order.
    async fn order_details(&self, order_code: OrderCode) -> Result<Vec<OrderDetail>>;

    /// Lists every recorded shipment.
    async fn list_shipments(&self) -> Result<Vec<Shipment>>;

    /// Applies a change-set atomically.
    ///
    /// Enforces uniqueness (product/order/shipment codes, one stock row
    /// per product), referential integrity, and check constraints
    /// (non-negative stock units and order totals). Any violation rejects
    /// the whole change-set; no partial writes are ever observable.
    async fn commit(&self, changes: ChangeSet) -> Result<()>;
}
