//! The atomic unit of writes.
//!
//! Domain operations never write to the store directly. They compute a
//! [`ChangeSet`] describing every row to insert, update, or delete, and
//! hand it to [`Store::commit`], which applies it all-or-nothing.
//!
//! [`Store::commit`]: crate::Store::commit

use crate::entities::{Order, OrderDetail, Payment, PaymentDetail, Product, Shipment, Stock};

/// A set of writes applied atomically by [`Store::commit`].
///
/// Inserts are applied before updates, parents before children, so a
/// change-set may freely reference rows it creates itself (e.g. payment
/// details referencing the payment inserted by the same set).
///
/// [`Store::commit`]: crate::Store::commit
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    pub insert_products: Vec<Product>,
    pub insert_stocks: Vec<Stock>,
    pub update_products: Vec<Product>,
    pub update_stocks: Vec<Stock>,
    pub delete_products: Vec<String>,
    pub insert_orders: Vec<Order>,
    pub insert_order_details: Vec<OrderDetail>,
    pub update_orders: Vec<Order>,
    pub insert_payments: Vec<Payment>,
    pub insert_payment_details: Vec<PaymentDetail>,
    pub insert_shipments: Vec<Shipment>,
}

impl ChangeSet {
    /// Creates an empty change-set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the change-set contains no writes.
    pub fn is_empty(&self) -> bool {
        self.insert_products.is_empty()
            && self.insert_stocks.is_empty()
            && self.update_products.is_empty()
            && self.update_stocks.is_empty()
            && self.delete_products.is_empty()
            && self.insert_orders.is_empty()
            && self.insert_order_details.is_empty()
            && self.update_orders.is_empty()
            && self.insert_payments.is_empty()
            && self.insert_payment_details.is_empty()
            && self.insert_shipments.is_empty()
    }

    pub fn insert_product(mut self, product: Product) -> Self {
        self.insert_products.push(product);
        self
    }

    pub fn insert_stock(mut self, stock: Stock) -> Self {
        self.insert_stocks.push(stock);
        self
    }

    pub fn update_product(mut self, product: Product) -> Self {
        self.update_products.push(product);
        self
    }

    pub fn update_stock(mut self, stock: Stock) -> Self {
        self.update_stocks.push(stock);
        self
    }

    pub fn delete_product(mut self, code: impl Into<String>) -> Self {
        self.delete_products.push(code.into());
        self
    }

    pub fn insert_order(mut self, order: Order) -> Self {
        self.insert_orders.push(order);
        self
    }

    pub fn insert_order_detail(mut self, detail: OrderDetail) -> Self {
        self.insert_order_details.push(detail);
        self
    }

    pub fn insert_order_details(mut self, details: Vec<OrderDetail>) -> Self {
        self.insert_order_details.extend(details);
        self
    }

    pub fn update_order(mut self, order: Order) -> Self {
        self.update_orders.push(order);
        self
    }

    pub fn update_orders(mut self, orders: Vec<Order>) -> Self {
        self.update_orders.extend(orders);
        self
    }

    pub fn update_stocks(mut self, stocks: Vec<Stock>) -> Self {
        self.update_stocks.extend(stocks);
        self
    }

    pub fn insert_payment(mut self, payment: Payment) -> Self {
        self.insert_payments.push(payment);
        self
    }

    pub fn insert_payment_details(mut self, details: Vec<PaymentDetail>) -> Self {
        self.insert_payment_details.extend(details);
        self
    }

    pub fn insert_shipment(mut self, shipment: Shipment) -> Self {
        self.insert_shipments.push(shipment);
        self
    }
}
