//! Shipment recorder: attaches shipment records to existing orders.

use common::OrderCode;
use store::{ChangeSet, Shipment, Store, StoreError};

use crate::error::{DomainError, Result};

/// Service recording shipments against orders.
pub struct ShipmentRecorder<S: Store> {
    store: S,
}

impl<S: Store> ShipmentRecorder<S> {
    /// Creates a new shipment recorder over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Records a shipment against an existing order.
    ///
    /// Fails with a not-found error if no order has the given code.
    #[tracing::instrument(skip(self, start_address, end_address))]
    pub async fn add_shipment(
        &self,
        order_code: OrderCode,
        start_address: &str,
        end_address: &str,
    ) -> Result<Shipment> {
        let order = self
            .store
            .order(order_code)
            .await
            .map_err(record_failure)?
            .ok_or_else(|| {
                DomainError::NotFound(format!(
                    "error adding a new shipment. order with code {order_code} does not exist"
                ))
            })?;

        let shipment = Shipment::new(order.code, start_address.trim(), end_address.trim());

        self.store
            .commit(ChangeSet::new().insert_shipment(shipment.clone()))
            .await
            .map_err(record_failure)?;

        Ok(shipment)
    }
}

fn record_failure(e: StoreError) -> DomainError {
    tracing::error!(error = %e, "error adding a new shipment");
    DomainError::Validation("error adding a new shipment".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::{InMemoryStore, Order};

    #[tokio::test]
    async fn records_shipment_against_existing_order() {
        let store = InMemoryStore::new();
        let order = Order::new();
        store
            .commit(ChangeSet::new().insert_order(order.clone()))
            .await
            .unwrap();

        let recorder = ShipmentRecorder::new(store.clone());
        let shipment = recorder
            .add_shipment(order.code, " Warehouse A ", " Customer B ")
            .await
            .unwrap();

        assert_eq!(shipment.order_code, order.code);
        assert_eq!(shipment.start_address, "Warehouse A");
        assert_eq!(shipment.end_address, "Customer B");

        let shipments = store.list_shipments().await.unwrap();
        assert_eq!(shipments.len(), 1);
        assert_eq!(shipments[0].code, shipment.code);
    }

    #[tokio::test]
    async fn missing_order_is_not_found_with_no_mutation() {
        let store = InMemoryStore::new();
        let recorder = ShipmentRecorder::new(store.clone());

        let ghost = OrderCode::new();
        let err = recorder.add_shipment(ghost, "A", "B").await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
        assert!(err.message().contains(&ghost.to_string()));
        assert!(store.list_shipments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn each_shipment_gets_a_fresh_code() {
        let store = InMemoryStore::new();
        let order = Order::new();
        store
            .commit(ChangeSet::new().insert_order(order.clone()))
            .await
            .unwrap();

        let recorder = ShipmentRecorder::new(store);
        let s1 = recorder.add_shipment(order.code, "A", "B").await.unwrap();
        let s2 = recorder.add_shipment(order.code, "A", "B").await.unwrap();
        assert_ne!(s1.code, s2.code);
    }
}
