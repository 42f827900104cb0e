//! Entity rows persisted by the store.
//!
//! Every entity carries creation and modification timestamps. Identity
//! fields (`code`, ids) are immutable once the row is created; the domain
//! layer mutates copies and hands them back inside a [`ChangeSet`].
//!
//! [`ChangeSet`]: crate::ChangeSet

use chrono::{DateTime, Utc};
use common::{OrderCode, OrderState, ProductCategory, ShipmentCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sellable product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique short code identifying the product.
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub category: ProductCategory,
    /// Unit price, non-negative.
    pub price: i64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Product {
    /// Creates a new product with fresh timestamps.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        category: ProductCategory,
        price: i64,
        description: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            code: code.into(),
            name: name.into(),
            description,
            category,
            price,
            created_at: now,
            modified_at: now,
        }
    }

    /// Marks the row as modified now.
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

/// Available quantity of a product, one row per product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub product_code: String,
    /// Never persisted negative; both stores enforce the check.
    pub units: i64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Stock {
    /// Creates a new stock row for a product.
    pub fn new(product_code: impl Into<String>, units: i64) -> Self {
        let now = Utc::now();
        Self {
            product_code: product_code.into(),
            units,
            created_at: now,
            modified_at: now,
        }
    }

    /// Checks whether this product has at least `units` available.
    pub fn has_enough_units(&self, units: i64) -> bool {
        self.units >= units
    }

    /// Marks the row as modified now.
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

/// An order; `total` is the remaining amount owed and decreases toward
/// zero as payments are allocated against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub code: OrderCode,
    pub state: OrderState,
    pub total: f64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new outstanding order with a fresh code and zero total.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            code: OrderCode::new(),
            state: OrderState::Outstanding,
            total: 0.0,
            created_at: now,
            modified_at: now,
        }
    }

    /// Marks the row as modified now.
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

impl Default for Order {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable order line: the units requested and the unit price at the
/// time the order was placed. `product_code` is a snapshot, not a
/// reference, so the product may be deleted afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order_code: OrderCode,
    pub product_code: String,
    pub units: i64,
    /// Unit price snapshot at order time.
    pub price: i64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl OrderDetail {
    /// Creates a new order line.
    pub fn new(order_code: OrderCode, product_code: impl Into<String>, units: i64, price: i64) -> Self {
        let now = Utc::now();
        Self {
            order_code,
            product_code: product_code.into(),
            units,
            price,
            created_at: now,
            modified_at: now,
        }
    }
}

/// Immutable record of one settlement event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    /// Amount tendered.
    pub total: f64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a new payment record for the tendered amount.
    pub fn new(total: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            total,
            created_at: now,
            modified_at: now,
        }
    }
}

/// Immutable slice of a payment applied to one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetail {
    pub payment_id: Uuid,
    pub order_code: OrderCode,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl PaymentDetail {
    /// Creates a new payment line.
    pub fn new(payment_id: Uuid, order_code: OrderCode, amount: f64) -> Self {
        let now = Utc::now();
        Self {
            payment_id,
            order_code,
            amount,
            created_at: now,
            modified_at: now,
        }
    }
}

/// A shipment recorded against an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    pub code: ShipmentCode,
    pub order_code: OrderCode,
    pub start_address: String,
    pub end_address: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Shipment {
    /// Creates a new shipment with a fresh code.
    pub fn new(
        order_code: OrderCode,
        start_address: impl Into<String>,
        end_address: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            code: ShipmentCode::new(),
            order_code,
            start_address: start_address.into(),
            end_address: end_address.into(),
            created_at: now,
            modified_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_order_is_outstanding_with_zero_total() {
        let order = Order::new();
        assert_eq!(order.state, OrderState::Outstanding);
        assert_eq!(order.total, 0.0);
    }

    #[test]
    fn new_orders_get_unique_codes() {
        assert_ne!(Order::new().code, Order::new().code);
    }

    #[test]
    fn stock_has_enough_units() {
        let stock = Stock::new("P1", 10);
        assert!(stock.has_enough_units(10));
        assert!(stock.has_enough_units(3));
        assert!(!stock.has_enough_units(11));
    }

    #[test]
    fn touch_advances_modified_at() {
        let mut product = Product::new("P1", "Widget", ProductCategory::Electronic, 100, None);
        let before = product.modified_at;
        product.touch();
        assert!(product.modified_at >= before);
    }
}
