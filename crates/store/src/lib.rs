pub mod changes;
pub mod entities;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use changes::ChangeSet;
pub use entities::{Order, OrderDetail, Payment, PaymentDetail, Product, Shipment, Stock};
pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use store::Store;
