//! Closed enumerations shared by the domain core and the storage adapters.

use serde::{Deserialize, Serialize};

/// Category a product belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    Food,
    Electronic,
    Clothing,
    Books,
}

impl ProductCategory {
    /// Every wire value accepted for a category, in declaration order.
    pub const VALID_VALUES: [i16; 4] = [0, 1, 2, 3];

    /// Resolves a wire value into a category, if it is a member of the set.
    pub fn from_value(value: i16) -> Option<Self> {
        match value {
            0 => Some(ProductCategory::Food),
            1 => Some(ProductCategory::Electronic),
            2 => Some(ProductCategory::Clothing),
            3 => Some(ProductCategory::Books),
            _ => None,
        }
    }

    /// Returns the wire value for this category.
    pub fn value(&self) -> i16 {
        match self {
            ProductCategory::Food => 0,
            ProductCategory::Electronic => 1,
            ProductCategory::Clothing => 2,
            ProductCategory::Books => 3,
        }
    }

    /// Returns the category name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Food => "Food",
            ProductCategory::Electronic => "Electronic",
            ProductCategory::Clothing => "Clothing",
            ProductCategory::Books => "Books",
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The state of an order in its lifecycle.
///
/// State transitions:
/// ```text
/// Outstanding ──► Paid ──► Delivered
/// ```
///
/// An order moves to `Paid` only when payment allocation drives its
/// remaining total to exactly zero. `Delivered` is set by shipment
/// completion logic outside this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderState {
    #[default]
    Outstanding,
    Paid,
    Delivered,
}

impl OrderState {
    /// Every wire value accepted for an order state, in declaration order.
    pub const VALID_VALUES: [i16; 3] = [0, 1, 2];

    /// Resolves a wire value into an order state, if it is a member of the set.
    pub fn from_value(value: i16) -> Option<Self> {
        match value {
            0 => Some(OrderState::Outstanding),
            1 => Some(OrderState::Paid),
            2 => Some(OrderState::Delivered),
            _ => None,
        }
    }

    /// Returns the wire value for this state.
    pub fn value(&self) -> i16 {
        match self {
            OrderState::Outstanding => 0,
            OrderState::Paid => 1,
            OrderState::Delivered => 2,
        }
    }

    /// Returns true if the order can still receive payment allocations.
    pub fn is_payable(&self) -> bool {
        matches!(self, OrderState::Outstanding)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderState::Outstanding => "Outstanding",
            OrderState::Paid => "Paid",
            OrderState::Delivered => "Delivered",
        }
    }
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_value_roundtrip() {
        for value in ProductCategory::VALID_VALUES {
            let category = ProductCategory::from_value(value).unwrap();
            assert_eq!(category.value(), value);
        }
    }

    #[test]
    fn category_rejects_unknown_values() {
        assert!(ProductCategory::from_value(4).is_none());
        assert!(ProductCategory::from_value(-1).is_none());
    }

    #[test]
    fn default_state_is_outstanding() {
        assert_eq!(OrderState::default(), OrderState::Outstanding);
    }

    #[test]
    fn only_outstanding_is_payable() {
        assert!(OrderState::Outstanding.is_payable());
        assert!(!OrderState::Paid.is_payable());
        assert!(!OrderState::Delivered.is_payable());
    }

    #[test]
    fn state_value_roundtrip() {
        for value in OrderState::VALID_VALUES {
            let state = OrderState::from_value(value).unwrap();
            assert_eq!(state.value(), value);
        }
    }

    #[test]
    fn display_names() {
        assert_eq!(ProductCategory::Electronic.to_string(), "Electronic");
        assert_eq!(OrderState::Outstanding.to_string(), "Outstanding");
    }
}
