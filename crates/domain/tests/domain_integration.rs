//! Integration tests for the domain core against the in-memory store.
//!
//! These tests exercise the full fetch → plan → commit path of every
//! service and verify the atomicity guarantees end to end.

use common::{OrderCode, OrderState};
use domain::{
    Catalog, DomainError, OrderEngine, OrderLine, PaymentAllocator, ProductInput, ShipmentRecorder,
};
use store::{InMemoryStore, Order, Store};

const ELECTRONIC: i16 = 1;
const CLOTHING: i16 = 2;

async fn seed_product(store: &InMemoryStore, code: &str, price: i64, units: i64) {
    Catalog::new(store.clone())
        .add_product(ProductInput::new(
            code,
            format!("Product {code}"),
            ELECTRONIC,
            price,
            units,
            Some(format!("Product {code} description")),
        ))
        .await
        .unwrap();
}

async fn stock_units(store: &InMemoryStore, code: &str) -> i64 {
    let (_, stock) = store.stock_with_product(code).await.unwrap().unwrap();
    stock.units
}

async fn order_with_total(store: &InMemoryStore, total: f64) -> Order {
    seed_product(store, &format!("T{total}"), 1, total as i64).await;
    OrderEngine::new(store.clone())
        .create_order(&[OrderLine::new(format!("T{total}"), total as i64)])
        .await
        .unwrap()
}

mod order_creation {
    use super::*;

    #[tokio::test]
    async fn order_total_and_stock_decrements() {
        let store = InMemoryStore::new();
        seed_product(&store, "P1", 100, 10).await;
        seed_product(&store, "P2", 70, 20).await;
        Catalog::new(store.clone())
            .add_product(ProductInput::new("P3", "Product3", CLOTHING, 20, 20, None))
            .await
            .unwrap();

        let order = OrderEngine::new(store.clone())
            .create_order(&[
                OrderLine::new("P1", 2),
                OrderLine::new("P2", 4),
                OrderLine::new("P3", 19),
            ])
            .await
            .unwrap();

        assert_eq!(order.total, 2.0 * 100.0 + 4.0 * 70.0 + 19.0 * 20.0);
        assert_eq!(order.state, OrderState::Outstanding);
        assert_eq!(stock_units(&store, "P1").await, 8);
        assert_eq!(stock_units(&store, "P2").await, 16);
        assert_eq!(stock_units(&store, "P3").await, 1);

        let details = store.order_details(order.code).await.unwrap();
        assert_eq!(details.len(), 3);
        assert!(details.iter().all(|d| d.order_code == order.code));
    }

    #[tokio::test]
    async fn insufficient_stock_mutates_nothing() {
        let store = InMemoryStore::new();
        seed_product(&store, "P1", 100, 10).await;
        seed_product(&store, "P2", 70, 20).await;

        let err = OrderEngine::new(store.clone())
            .create_order(&[OrderLine::new("P1", 2), OrderLine::new("P2", 100)])
            .await
            .unwrap_err();

        assert_eq!(err.message(), "product P2 does not have enough stock");
        // even the line that would have succeeded is untouched
        assert_eq!(stock_units(&store, "P1").await, 10);
        assert_eq!(stock_units(&store, "P2").await, 20);
    }

    #[tokio::test]
    async fn unknown_product_code_mutates_nothing() {
        let store = InMemoryStore::new();
        seed_product(&store, "P1", 100, 10).await;

        let err = OrderEngine::new(store.clone())
            .create_order(&[OrderLine::new("P1", 2), OrderLine::new("GHOST", 1)])
            .await
            .unwrap_err();

        assert_eq!(err.message(), "some product codes do not exist");
        assert_eq!(stock_units(&store, "P1").await, 10);
    }

    #[tokio::test]
    async fn duplicate_lines_are_rejected() {
        let store = InMemoryStore::new();
        seed_product(&store, "P1", 100, 10).await;

        let err = OrderEngine::new(store.clone())
            .create_order(&[OrderLine::new("P1", 2), OrderLine::new("P1", 3)])
            .await
            .unwrap_err();

        assert_eq!(err.message(), "duplicate product codes in order request");
        assert_eq!(stock_units(&store, "P1").await, 10);
    }
}

mod payment_allocation {
    use super::*;

    #[tokio::test]
    async fn rejects_amount_above_order_totals() {
        let store = InMemoryStore::new();
        let o1 = order_with_total(&store, 270.0).await;
        let o2 = order_with_total(&store, 100.0).await;

        let err = PaymentAllocator::new(store.clone())
            .pay(&[o1.code, o2.code], 371.0)
            .await
            .unwrap_err();

        assert_eq!(err.message(), "payment value is bigger than orders amounts");
        assert_eq!(store.order(o1.code).await.unwrap().unwrap().total, 270.0);
        assert_eq!(store.order(o2.code).await.unwrap().unwrap().total, 100.0);
    }

    #[tokio::test]
    async fn rejects_unknown_order_code_with_no_mutation() {
        let store = InMemoryStore::new();
        let o1 = order_with_total(&store, 270.0).await;

        // zero amount keeps the pre-check satisfied over the fetched set
        let err = PaymentAllocator::new(store.clone())
            .pay(&[o1.code, OrderCode::new()], 0.0)
            .await
            .unwrap_err();

        assert_eq!(
            err.message(),
            "some order codes do not exist or have already been paid"
        );
        let untouched = store.order(o1.code).await.unwrap().unwrap();
        assert_eq!(untouched.total, 270.0);
        assert_eq!(untouched.state, OrderState::Outstanding);
        assert_eq!(store.payment_count().await, 0);
    }

    #[tokio::test]
    async fn rejects_already_paid_order() {
        let store = InMemoryStore::new();
        let o1 = order_with_total(&store, 270.0).await;
        let allocator = PaymentAllocator::new(store.clone());

        allocator.pay(&[o1.code], 270.0).await.unwrap();
        let err = allocator.pay(&[o1.code], 0.0).await.unwrap_err();

        assert_eq!(
            err.message(),
            "some order codes do not exist or have already been paid"
        );
    }

    #[tokio::test]
    async fn exact_sum_settles_every_order() {
        let store = InMemoryStore::new();
        let o1 = order_with_total(&store, 270.0).await;
        let o2 = order_with_total(&store, 100.0).await;

        let payment = PaymentAllocator::new(store.clone())
            .pay(&[o1.code, o2.code], 370.0)
            .await
            .unwrap();
        assert_eq!(payment.total, 370.0);

        for code in [o1.code, o2.code] {
            let settled = store.order(code).await.unwrap().unwrap();
            assert_eq!(settled.total, 0.0);
            assert_eq!(settled.state, OrderState::Paid);
        }

        let details = store.payment_details().await;
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].amount, 270.0);
        assert_eq!(details[1].amount, 100.0);
    }

    #[tokio::test]
    async fn partial_sum_settles_in_fetch_order() {
        let store = InMemoryStore::new();
        let o1 = order_with_total(&store, 270.0).await;
        let o2 = order_with_total(&store, 100.0).await;

        PaymentAllocator::new(store.clone())
            .pay(&[o1.code, o2.code], 300.0)
            .await
            .unwrap();

        let first = store.order(o1.code).await.unwrap().unwrap();
        assert_eq!(first.total, 0.0);
        assert_eq!(first.state, OrderState::Paid);

        let second = store.order(o2.code).await.unwrap().unwrap();
        assert_eq!(second.total, 70.0);
        assert_eq!(second.state, OrderState::Outstanding);
    }

    #[tokio::test]
    async fn exact_match_on_first_order_leaves_later_orders_untouched() {
        let store = InMemoryStore::new();
        let o1 = order_with_total(&store, 270.0).await;
        let o2 = order_with_total(&store, 100.0).await;

        PaymentAllocator::new(store.clone())
            .pay(&[o1.code, o2.code], 270.0)
            .await
            .unwrap();

        assert_eq!(store.order(o1.code).await.unwrap().unwrap().state, OrderState::Paid);
        let untouched = store.order(o2.code).await.unwrap().unwrap();
        assert_eq!(untouched.total, 100.0);
        assert_eq!(untouched.state, OrderState::Outstanding);
    }

    #[tokio::test]
    async fn remainder_can_be_settled_by_a_second_payment() {
        let store = InMemoryStore::new();
        let o1 = order_with_total(&store, 270.0).await;
        let o2 = order_with_total(&store, 100.0).await;
        let allocator = PaymentAllocator::new(store.clone());

        allocator.pay(&[o1.code, o2.code], 300.0).await.unwrap();
        allocator.pay(&[o2.code], 70.0).await.unwrap();

        let settled = store.order(o2.code).await.unwrap().unwrap();
        assert_eq!(settled.total, 0.0);
        assert_eq!(settled.state, OrderState::Paid);
        assert_eq!(store.payment_count().await, 2);
    }
}

mod shipment_recording {
    use super::*;

    #[tokio::test]
    async fn records_shipment_for_existing_order() {
        let store = InMemoryStore::new();
        let order = order_with_total(&store, 50.0).await;

        let shipment = ShipmentRecorder::new(store.clone())
            .add_shipment(order.code, "Warehouse A", "Customer B")
            .await
            .unwrap();

        assert_eq!(shipment.order_code, order.code);
        assert_eq!(store.list_shipments().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_order_fails_with_no_mutation() {
        let store = InMemoryStore::new();

        let err = ShipmentRecorder::new(store.clone())
            .add_shipment(OrderCode::new(), "A", "B")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
        assert!(store.list_shipments().await.unwrap().is_empty());
    }
}

mod catalog_lifecycle {
    use super::*;

    #[tokio::test]
    async fn duplicate_product_leaves_no_partial_rows() {
        let store = InMemoryStore::new();
        let catalog = Catalog::new(store.clone());

        seed_product(&store, "P1", 100, 10).await;
        let err = catalog
            .add_product(ProductInput::new("P1", "Other", ELECTRONIC, 1, 1, None))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Duplicate(_)));
        let (product, stock) = store.stock_with_product("P1").await.unwrap().unwrap();
        assert_eq!(product.price, 100);
        assert_eq!(stock.units, 10);
    }

    #[tokio::test]
    async fn deleted_product_can_no_longer_be_ordered() {
        let store = InMemoryStore::new();
        seed_product(&store, "P1", 100, 10).await;

        Catalog::new(store.clone()).delete_product("P1").await.unwrap();

        let err = OrderEngine::new(store)
            .create_order(&[OrderLine::new("P1", 1)])
            .await
            .unwrap_err();
        assert_eq!(err.message(), "some product codes do not exist");
    }

    #[tokio::test]
    async fn ordered_product_survives_deletion_in_order_details() {
        let store = InMemoryStore::new();
        seed_product(&store, "P1", 100, 10).await;

        let order = OrderEngine::new(store.clone())
            .create_order(&[OrderLine::new("P1", 2)])
            .await
            .unwrap();
        Catalog::new(store.clone()).delete_product("P1").await.unwrap();

        // details snapshot the product code and price at order time
        let details = store.order_details(order.code).await.unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].product_code, "P1");
        assert_eq!(details[0].price, 100);
    }
}
