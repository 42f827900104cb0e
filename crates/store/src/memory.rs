use std::sync::Arc;

use async_trait::async_trait;
use common::OrderCode;
use tokio::sync::RwLock;

use crate::{
    ChangeSet, Result, StoreError,
    entities::{Order, OrderDetail, Payment, PaymentDetail, Product, Shipment, Stock},
    store::Store,
};

/// All tables, Vec-backed so that iteration order is insertion order —
/// the same order a serial primary key gives the SQL implementation.
#[derive(Debug, Clone, Default)]
struct Tables {
    products: Vec<Product>,
    stocks: Vec<Stock>,
    orders: Vec<Order>,
    order_details: Vec<OrderDetail>,
    payments: Vec<Payment>,
    payment_details: Vec<PaymentDetail>,
    shipments: Vec<Shipment>,
}

/// In-memory store implementation for tests and local runs.
///
/// Provides the same interface and constraint semantics as the
/// PostgreSQL implementation. `commit` stages every write against a
/// clone of the tables and swaps it in only once all constraints pass,
/// so a failed change-set leaves nothing behind.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of payments recorded.
    pub async fn payment_count(&self) -> usize {
        self.tables.read().await.payments.len()
    }

    /// Returns the payment details recorded, in insertion order.
    pub async fn payment_details(&self) -> Vec<PaymentDetail> {
        self.tables.read().await.payment_details.clone()
    }

    /// Clears every table.
    pub async fn clear(&self) {
        *self.tables.write().await = Tables::default();
    }
}

impl Tables {
    fn apply(&mut self, changes: ChangeSet) -> Result<()> {
        for product in changes.insert_products {
            if self.products.iter().any(|p| p.code == product.code) {
                return Err(StoreError::UniqueViolation {
                    entity: "products",
                    key: product.code,
                });
            }
            self.products.push(product);
        }

        for stock in changes.insert_stocks {
            if !self.products.iter().any(|p| p.code == stock.product_code) {
                return Err(StoreError::ForeignKeyViolation {
                    entity: "stocks",
                    key: stock.product_code,
                });
            }
            if self.stocks.iter().any(|s| s.product_code == stock.product_code) {
                return Err(StoreError::UniqueViolation {
                    entity: "stocks",
                    key: stock.product_code,
                });
            }
            if stock.units < 0 {
                return Err(StoreError::CheckViolation {
                    entity: "stocks",
                    key: stock.product_code,
                });
            }
            self.stocks.push(stock);
        }

        for product in changes.update_products {
            let row = self
                .products
                .iter_mut()
                .find(|p| p.code == product.code)
                .ok_or_else(|| StoreError::RowNotFound {
                    entity: "products",
                    key: product.code.clone(),
                })?;
            *row = product;
        }

        for stock in changes.update_stocks {
            if stock.units < 0 {
                return Err(StoreError::CheckViolation {
                    entity: "stocks",
                    key: stock.product_code,
                });
            }
            let row = self
                .stocks
                .iter_mut()
                .find(|s| s.product_code == stock.product_code)
                .ok_or_else(|| StoreError::RowNotFound {
                    entity: "stocks",
                    key: stock.product_code.clone(),
                })?;
            *row = stock;
        }

        for code in changes.delete_products {
            if !self.products.iter().any(|p| p.code == code) {
                return Err(StoreError::RowNotFound {
                    entity: "products",
                    key: code,
                });
            }
            self.products.retain(|p| p.code != code);
            // stock cascades with its product
            self.stocks.retain(|s| s.product_code != code);
        }

        for order in changes.insert_orders {
            if self.orders.iter().any(|o| o.code == order.code) {
                return Err(StoreError::UniqueViolation {
                    entity: "orders",
                    key: order.code.to_string(),
                });
            }
            if order.total < 0.0 {
                return Err(StoreError::CheckViolation {
                    entity: "orders",
                    key: order.code.to_string(),
                });
            }
            self.orders.push(order);
        }

        for detail in changes.insert_order_details {
            if !self.orders.iter().any(|o| o.code == detail.order_code) {
                return Err(StoreError::ForeignKeyViolation {
                    entity: "order_details",
                    key: detail.order_code.to_string(),
                });
            }
            self.order_details.push(detail);
        }

        for order in changes.update_orders {
            if order.total < 0.0 {
                return Err(StoreError::CheckViolation {
                    entity: "orders",
                    key: order.code.to_string(),
                });
            }
            let row = self
                .orders
                .iter_mut()
                .find(|o| o.code == order.code)
                .ok_or_else(|| StoreError::RowNotFound {
                    entity: "orders",
                    key: order.code.to_string(),
                })?;
            *row = order;
        }

        for payment in changes.insert_payments {
            if self.payments.iter().any(|p| p.id == payment.id) {
                return Err(StoreError::UniqueViolation {
                    entity: "payments",
                    key: payment.id.to_string(),
                });
            }
            self.payments.push(payment);
        }

        for detail in changes.insert_payment_details {
            if !self.payments.iter().any(|p| p.id == detail.payment_id) {
                return Err(StoreError::ForeignKeyViolation {
                    entity: "payment_details",
                    key: detail.payment_id.to_string(),
                });
            }
            if !self.orders.iter().any(|o| o.code == detail.order_code) {
                return Err(StoreError::ForeignKeyViolation {
                    entity: "payment_details",
                    key: detail.order_code.to_string(),
                });
            }
            self.payment_details.push(detail);
        }

        for shipment in changes.insert_shipments {
            if self.shipments.iter().any(|s| s.code == shipment.code) {
                return Err(StoreError::UniqueViolation {
                    entity: "shipments",
                    key: shipment.code.to_string(),
                });
            }
            if !self.orders.iter().any(|o| o.code == shipment.order_code) {
                return Err(StoreError::ForeignKeyViolation {
                    entity: "shipments",
                    key: shipment.order_code.to_string(),
                });
            }
            self.shipments.push(shipment);
        }

        Ok(())
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn product(&self, code: &str) -> Result<Option<Product>> {
        let tables = self.tables.read().await;
        Ok(tables.products.iter().find(|p| p.code == code).cloned())
    }

    async fn stock_with_product(&self, code: &str) -> Result<Option<(Product, Stock)>> {
        let tables = self.tables.read().await;
        let Some(stock) = tables.stocks.iter().find(|s| s.product_code == code) else {
            return Ok(None);
        };
        let product = tables
            .products
            .iter()
            .find(|p| p.code == stock.product_code)
            .cloned()
            .ok_or_else(|| StoreError::ForeignKeyViolation {
                entity: "stocks",
                key: stock.product_code.clone(),
            })?;
        Ok(Some((product, stock.clone())))
    }

    async fn stocks_for_products(&self, codes: &[String]) -> Result<Vec<(Product, Stock)>> {
        let tables = self.tables.read().await;
        let mut rows = Vec::new();
        for stock in tables.stocks.iter() {
            if !codes.contains(&stock.product_code) {
                continue;
            }
            let product = tables
                .products
                .iter()
                .find(|p| p.code == stock.product_code)
                .cloned()
                .ok_or_else(|| StoreError::ForeignKeyViolation {
                    entity: "stocks",
                    key: stock.product_code.clone(),
                })?;
            rows.push((product, stock.clone()));
        }
        Ok(rows)
    }

    async fn list_products(&self) -> Result<Vec<(Product, Stock)>> {
        let tables = self.tables.read().await;
        let mut rows = Vec::new();
        for stock in tables.stocks.iter() {
            let product = tables
                .products
                .iter()
                .find(|p| p.code == stock.product_code)
                .cloned()
                .ok_or_else(|| StoreError::ForeignKeyViolation {
                    entity: "stocks",
                    key: stock.product_code.clone(),
                })?;
            rows.push((product, stock.clone()));
        }
        Ok(rows)
    }

    async fn order(&self, code: OrderCode) -> Result<Option<Order>> {
        let tables = self.tables.read().await;
        Ok(tables.orders.iter().find(|o| o.code == code).cloned())
    }

    async fn orders_by_codes(&self, codes: &[OrderCode]) -> Result<Vec<Order>> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .iter()
            .filter(|o| codes.contains(&o.code))
            .cloned()
            .collect())
    }

    async fn order_details(&self, order_code: OrderCode) -> Result<Vec<OrderDetail>> {
        let tables = self.tables.read().await;
        Ok(tables
            .order_details
            .iter()
            .filter(|d| d.order_code == order_code)
            .cloned()
            .collect())
    }

    async fn list_shipments(&self) -> Result<Vec<Shipment>> {
        let tables = self.tables.read().await;
        Ok(tables.shipments.clone())
    }

    async fn commit(&self, changes: ChangeSet) -> Result<()> {
        let mut tables = self.tables.write().await;
        // Stage against a clone; swap in only if every constraint passes.
        let mut staged = tables.clone();
        staged.apply(changes)?;
        *tables = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ProductCategory;

    fn product(code: &str, price: i64) -> Product {
        Product::new(code, format!("Product {code}"), ProductCategory::Food, price, None)
    }

    #[tokio::test]
    async fn commit_inserts_product_with_stock() {
        let store = InMemoryStore::new();
        let changes = ChangeSet::new()
            .insert_product(product("P1", 100))
            .insert_stock(Stock::new("P1", 10));

        store.commit(changes).await.unwrap();

        let (fetched, stock) = store.stock_with_product("P1").await.unwrap().unwrap();
        assert_eq!(fetched.code, "P1");
        assert_eq!(stock.units, 10);
    }

    #[tokio::test]
    async fn duplicate_product_code_rejects_whole_change_set() {
        let store = InMemoryStore::new();
        store
            .commit(
                ChangeSet::new()
                    .insert_product(product("P1", 100))
                    .insert_stock(Stock::new("P1", 10)),
            )
            .await
            .unwrap();

        let err = store
            .commit(
                ChangeSet::new()
                    .insert_product(product("P1", 200))
                    .insert_stock(Stock::new("P1", 5)),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::UniqueViolation { entity: "products", .. }));
        // original rows untouched
        let (fetched, stock) = store.stock_with_product("P1").await.unwrap().unwrap();
        assert_eq!(fetched.price, 100);
        assert_eq!(stock.units, 10);
    }

    #[tokio::test]
    async fn stock_without_product_is_a_foreign_key_violation() {
        let store = InMemoryStore::new();
        let err = store
            .commit(ChangeSet::new().insert_stock(Stock::new("MISSING", 5)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn negative_stock_units_never_persisted() {
        let store = InMemoryStore::new();
        store
            .commit(
                ChangeSet::new()
                    .insert_product(product("P1", 100))
                    .insert_stock(Stock::new("P1", 10)),
            )
            .await
            .unwrap();

        let mut stock = Stock::new("P1", 10);
        stock.units = -1;
        let err = store
            .commit(ChangeSet::new().update_stock(stock))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::CheckViolation { entity: "stocks", .. }));
        let (_, stock) = store.stock_with_product("P1").await.unwrap().unwrap();
        assert_eq!(stock.units, 10);
    }

    #[tokio::test]
    async fn failed_change_set_applies_nothing() {
        let store = InMemoryStore::new();
        // P2 insert is valid on its own, but the set also carries a
        // dangling stock row, so neither may land.
        let err = store
            .commit(
                ChangeSet::new()
                    .insert_product(product("P2", 50))
                    .insert_stock(Stock::new("P2", 5))
                    .insert_stock(Stock::new("GHOST", 1)),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::ForeignKeyViolation { .. }));
        assert!(store.product("P2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_product_cascades_to_stock() {
        let store = InMemoryStore::new();
        store
            .commit(
                ChangeSet::new()
                    .insert_product(product("P1", 100))
                    .insert_stock(Stock::new("P1", 10)),
            )
            .await
            .unwrap();

        store
            .commit(ChangeSet::new().delete_product("P1"))
            .await
            .unwrap();

        assert!(store.product("P1").await.unwrap().is_none());
        assert!(store.stock_with_product("P1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn orders_fetched_in_insertion_order() {
        let store = InMemoryStore::new();
        let mut o1 = Order::new();
        o1.total = 270.0;
        let mut o2 = Order::new();
        o2.total = 100.0;
        let codes = vec![o2.code, o1.code];

        store
            .commit(ChangeSet::new().insert_order(o1.clone()).insert_order(o2.clone()))
            .await
            .unwrap();

        // insertion order wins regardless of the order codes were asked in
        let fetched = store.orders_by_codes(&codes).await.unwrap();
        assert_eq!(fetched[0].code, o1.code);
        assert_eq!(fetched[1].code, o2.code);
    }

    #[tokio::test]
    async fn shipment_requires_existing_order() {
        let store = InMemoryStore::new();
        let err = store
            .commit(ChangeSet::new().insert_shipment(Shipment::new(
                OrderCode::new(),
                "from",
                "to",
            )))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation { entity: "shipments", .. }));
    }
}
