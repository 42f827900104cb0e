use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an order.
///
/// Wraps a UUID to provide type safety and prevent mixing up
/// order codes with other UUID-based identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderCode(Uuid);

impl OrderCode {
    /// Creates a new random order code.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an order code from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for OrderCode {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrderCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for OrderCode {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<OrderCode> for Uuid {
    fn from(code: OrderCode) -> Self {
        code.0
    }
}

/// Unique identifier for a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShipmentCode(Uuid);

impl ShipmentCode {
    /// Creates a new random shipment code.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a shipment code from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ShipmentCode {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ShipmentCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ShipmentCode {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ShipmentCode> for Uuid {
    fn from(code: ShipmentCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_code_new_creates_unique_codes() {
        let c1 = OrderCode::new();
        let c2 = OrderCode::new();
        assert_ne!(c1, c2);
    }

    #[test]
    fn order_code_from_uuid_preserves_value() {
        let uuid = Uuid::new_v4();
        let code = OrderCode::from_uuid(uuid);
        assert_eq!(code.as_uuid(), uuid);
    }

    #[test]
    fn order_code_serialization_roundtrip() {
        let code = OrderCode::new();
        let json = serde_json::to_string(&code).unwrap();
        let deserialized: OrderCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, deserialized);
    }

    #[test]
    fn shipment_code_new_creates_unique_codes() {
        let c1 = ShipmentCode::new();
        let c2 = ShipmentCode::new();
        assert_ne!(c1, c2);
    }
}
