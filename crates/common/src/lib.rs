pub mod enums;
pub mod types;

pub use enums::{OrderState, ProductCategory};
pub use types::{OrderCode, ShipmentCode};
