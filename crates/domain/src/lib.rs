//! Transactional domain core for the order-management system.
//!
//! This crate provides the four domain services:
//! - [`Catalog`] — product and stock lifecycle
//! - [`OrderEngine`] — stock-reserving order creation
//! - [`PaymentAllocator`] — multi-order payment settlement
//! - [`ShipmentRecorder`] — shipment records against orders
//!
//! Each operation fetches what it needs, runs pure validation and
//! computation, and commits a single change-set atomically. Business
//! failures surface as [`DomainError`] with a human-readable message;
//! storage internals never leak.

pub mod catalog;
pub mod error;
pub mod orders;
pub mod payments;
pub mod shipments;

pub use catalog::{Catalog, ProductInput};
pub use common::{OrderCode, OrderState, ProductCategory, ShipmentCode};
pub use error::{DomainError, Result};
pub use orders::{OrderEngine, OrderLine, OrderPlan, plan_order};
pub use payments::{PaymentAllocator, PaymentPlan, allocate_payment};
pub use shipments::ShipmentRecorder;
pub use store::{Order, OrderDetail, Payment, PaymentDetail, Product, Shipment, Stock};
