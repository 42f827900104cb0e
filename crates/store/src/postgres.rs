use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{OrderCode, OrderState, ProductCategory, ShipmentCode};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    ChangeSet, Result, StoreError,
    entities::{Order, OrderDetail, Product, Shipment, Stock},
    store::Store,
};

/// PostgreSQL-backed store implementation.
///
/// Every [`commit`] runs inside a single transaction, so the database's
/// own constraints and isolation provide the all-or-nothing guarantee.
///
/// [`commit`]: Store::commit
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_product(row: &PgRow) -> Result<Product> {
        let category_value: i16 = row.try_get("category")?;
        let category = ProductCategory::from_value(category_value)
            .ok_or_else(|| unknown_enum_value("category", category_value))?;

        Ok(Product {
            code: row.try_get("code")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            category,
            price: row.try_get("price")?,
            created_at: row.try_get("created_at")?,
            modified_at: row.try_get("modified_at")?,
        })
    }

    fn row_to_stock(row: &PgRow) -> Result<Stock> {
        Ok(Stock {
            product_code: row.try_get("product_code")?,
            units: row.try_get("units")?,
            created_at: row.try_get("stock_created_at")?,
            modified_at: row.try_get("stock_modified_at")?,
        })
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let state_value: i16 = row.try_get("state")?;
        let state = OrderState::from_value(state_value)
            .ok_or_else(|| unknown_enum_value("state", state_value))?;

        Ok(Order {
            code: OrderCode::from_uuid(row.try_get::<Uuid, _>("code")?),
            state,
            total: row.try_get("total")?,
            created_at: row.try_get("created_at")?,
            modified_at: row.try_get("modified_at")?,
        })
    }

    fn row_to_order_detail(row: PgRow) -> Result<OrderDetail> {
        Ok(OrderDetail {
            order_code: OrderCode::from_uuid(row.try_get::<Uuid, _>("order_code")?),
            product_code: row.try_get("product_code")?,
            units: row.try_get("units")?,
            price: row.try_get("price")?,
            created_at: row.try_get("created_at")?,
            modified_at: row.try_get("modified_at")?,
        })
    }

    fn row_to_shipment(row: PgRow) -> Result<Shipment> {
        Ok(Shipment {
            code: ShipmentCode::from_uuid(row.try_get::<Uuid, _>("code")?),
            order_code: OrderCode::from_uuid(row.try_get::<Uuid, _>("order_code")?),
            start_address: row.try_get("start_address")?,
            end_address: row.try_get("end_address")?,
            created_at: row.try_get("created_at")?,
            modified_at: row.try_get("modified_at")?,
        })
    }
}

fn unknown_enum_value(column: &str, value: i16) -> StoreError {
    StoreError::Database(sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: format!("unknown enum value {value}").into(),
    })
}

/// Maps a database error onto the matching constraint variant, using the
/// SQLSTATE class: 23505 unique, 23503 foreign key, 23514 check.
fn map_db_error(e: sqlx::Error, entity: &'static str, key: String) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e {
        match db_err.code().as_deref() {
            Some("23505") => return StoreError::UniqueViolation { entity, key },
            Some("23503") => return StoreError::ForeignKeyViolation { entity, key },
            Some("23514") => return StoreError::CheckViolation { entity, key },
            _ => {}
        }
    }
    StoreError::Database(e)
}

const STOCK_JOIN_SELECT: &str = r#"
    SELECT p.code, p.name, p.description, p.category, p.price,
           p.created_at, p.modified_at,
           s.product_code, s.units,
           s.created_at AS stock_created_at, s.modified_at AS stock_modified_at
    FROM stocks s
    JOIN products p ON p.code = s.product_code
"#;

#[async_trait]
impl Store for PostgresStore {
    async fn product(&self, code: &str) -> Result<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT code, name, description, category, price, created_at, modified_at
            FROM products
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Self::row_to_product(&r)).transpose()
    }

    async fn stock_with_product(&self, code: &str) -> Result<Option<(Product, Stock)>> {
        let row = sqlx::query(&format!("{STOCK_JOIN_SELECT} WHERE s.product_code = $1"))
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| Ok((Self::row_to_product(&r)?, Self::row_to_stock(&r)?)))
            .transpose()
    }

    async fn stocks_for_products(&self, codes: &[String]) -> Result<Vec<(Product, Stock)>> {
        let rows = sqlx::query(&format!(
            "{STOCK_JOIN_SELECT} WHERE s.product_code = ANY($1) ORDER BY s.id"
        ))
        .bind(codes)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| Ok((Self::row_to_product(r)?, Self::row_to_stock(r)?)))
            .collect()
    }

    async fn list_products(&self) -> Result<Vec<(Product, Stock)>> {
        let rows = sqlx::query(&format!("{STOCK_JOIN_SELECT} ORDER BY s.id"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|r| Ok((Self::row_to_product(r)?, Self::row_to_stock(r)?)))
            .collect()
    }

    async fn order(&self, code: OrderCode) -> Result<Option<Order>> {
        let row = sqlx::query(
            r#"
            SELECT code, state, total, created_at, modified_at
            FROM orders
            WHERE code = $1
            "#,
        )
        .bind(code.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn orders_by_codes(&self, codes: &[OrderCode]) -> Result<Vec<Order>> {
        let uuids: Vec<Uuid> = codes.iter().map(|c| c.as_uuid()).collect();
        let rows = sqlx::query(
            r#"
            SELECT code, state, total, created_at, modified_at
            FROM orders
            WHERE code = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn order_details(&self, order_code: OrderCode) -> Result<Vec<OrderDetail>> {
        let rows = sqlx::query(
            r#"
            SELECT order_code, product_code, units, price, created_at, modified_at
            FROM order_details
            WHERE order_code = $1
            ORDER BY id
            "#,
        )
        .bind(order_code.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order_detail).collect()
    }

    async fn list_shipments(&self) -> Result<Vec<Shipment>> {
        let rows = sqlx::query(
            r#"
            SELECT code, order_code, start_address, end_address, created_at, modified_at
            FROM shipments
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_shipment).collect()
    }

    async fn commit(&self, changes: ChangeSet) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for product in &changes.insert_products {
            sqlx::query(
                r#"
                INSERT INTO products (code, name, description, category, price, created_at, modified_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(&product.code)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.category.value())
            .bind(product.price)
            .bind(product.created_at)
            .bind(product.modified_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "products", product.code.clone()))?;
        }

        for stock in &changes.insert_stocks {
            sqlx::query(
                r#"
                INSERT INTO stocks (product_code, units, created_at, modified_at)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(&stock.product_code)
            .bind(stock.units)
            .bind(stock.created_at)
            .bind(stock.modified_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "stocks", stock.product_code.clone()))?;
        }

        for product in &changes.update_products {
            let result = sqlx::query(
                r#"
                UPDATE products
                SET name = $2, description = $3, category = $4, price = $5, modified_at = $6
                WHERE code = $1
                "#,
            )
            .bind(&product.code)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.category.value())
            .bind(product.price)
            .bind(product.modified_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "products", product.code.clone()))?;

            if result.rows_affected() == 0 {
                return Err(StoreError::RowNotFound {
                    entity: "products",
                    key: product.code.clone(),
                });
            }
        }

        for stock in &changes.update_stocks {
            let result = sqlx::query(
                r#"
                UPDATE stocks
                SET units = $2, modified_at = $3
                WHERE product_code = $1
                "#,
            )
            .bind(&stock.product_code)
            .bind(stock.units)
            .bind(stock.modified_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "stocks", stock.product_code.clone()))?;

            if result.rows_affected() == 0 {
                return Err(StoreError::RowNotFound {
                    entity: "stocks",
                    key: stock.product_code.clone(),
                });
            }
        }

        for code in &changes.delete_products {
            // stock cascades via ON DELETE CASCADE
            let result = sqlx::query("DELETE FROM products WHERE code = $1")
                .bind(code)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_db_error(e, "products", code.clone()))?;

            if result.rows_affected() == 0 {
                return Err(StoreError::RowNotFound {
                    entity: "products",
                    key: code.clone(),
                });
            }
        }

        for order in &changes.insert_orders {
            sqlx::query(
                r#"
                INSERT INTO orders (code, state, total, created_at, modified_at)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(order.code.as_uuid())
            .bind(order.state.value())
            .bind(order.total)
            .bind(order.created_at)
            .bind(order.modified_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "orders", order.code.to_string()))?;
        }

        for detail in &changes.insert_order_details {
            sqlx::query(
                r#"
                INSERT INTO order_details (order_code, product_code, units, price, created_at, modified_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(detail.order_code.as_uuid())
            .bind(&detail.product_code)
            .bind(detail.units)
            .bind(detail.price)
            .bind(detail.created_at)
            .bind(detail.modified_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "order_details", detail.order_code.to_string()))?;
        }

        for order in &changes.update_orders {
            let result = sqlx::query(
                r#"
                UPDATE orders
                SET state = $2, total = $3, modified_at = $4
                WHERE code = $1
                "#,
            )
            .bind(order.code.as_uuid())
            .bind(order.state.value())
            .bind(order.total)
            .bind(order.modified_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "orders", order.code.to_string()))?;

            if result.rows_affected() == 0 {
                return Err(StoreError::RowNotFound {
                    entity: "orders",
                    key: order.code.to_string(),
                });
            }
        }

        for payment in &changes.insert_payments {
            sqlx::query(
                r#"
                INSERT INTO payments (payment_id, total, created_at, modified_at)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(payment.id)
            .bind(payment.total)
            .bind(payment.created_at)
            .bind(payment.modified_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "payments", payment.id.to_string()))?;
        }

        for detail in &changes.insert_payment_details {
            sqlx::query(
                r#"
                INSERT INTO payment_details (payment_id, order_code, amount, created_at, modified_at)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(detail.payment_id)
            .bind(detail.order_code.as_uuid())
            .bind(detail.amount)
            .bind(detail.created_at)
            .bind(detail.modified_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "payment_details", detail.payment_id.to_string()))?;
        }

        for shipment in &changes.insert_shipments {
            sqlx::query(
                r#"
                INSERT INTO shipments (code, order_code, start_address, end_address, created_at, modified_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(shipment.code.as_uuid())
            .bind(shipment.order_code.as_uuid())
            .bind(&shipment.start_address)
            .bind(&shipment.end_address)
            .bind(shipment.created_at)
            .bind(shipment.modified_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "shipments", shipment.code.to_string()))?;
        }

        tx.commit().await?;
        Ok(())
    }
}
