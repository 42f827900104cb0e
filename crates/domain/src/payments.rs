//! Payment allocator: settles one payment across one or more orders.
//!
//! Orders are settled greedily in the order the store returned them
//! (primary-key order). An order whose remaining total is covered in
//! full moves to `Paid`; a partially covered order keeps its
//! `Outstanding` state with a reduced total.

use common::{OrderCode, OrderState};
use store::{ChangeSet, Order, Payment, PaymentDetail, Store, StoreError};

use crate::error::{DomainError, Result};

/// The writes a payment will perform: the payment record, one detail
/// per touched order, and the updated order rows.
#[derive(Debug, Clone)]
pub struct PaymentPlan {
    pub payment: Payment,
    pub details: Vec<PaymentDetail>,
    pub order_updates: Vec<Order>,
}

/// Distributes `amount` across `orders` greedily, in the given order.
///
/// Callers must have validated that `amount` does not exceed the sum of
/// the orders' totals; allocation itself never fails. Orders the
/// allocation never reaches are left out of the plan entirely.
pub fn allocate_payment(orders: Vec<Order>, amount: f64) -> PaymentPlan {
    let payment = Payment::new(amount);
    let mut remaining = amount;
    let mut details = Vec::new();
    let mut order_updates = Vec::new();

    for mut order in orders {
        if order.total == remaining {
            details.push(PaymentDetail::new(payment.id, order.code, order.total));
            order.total = 0.0;
            order.state = OrderState::Paid;
            order.touch();
            order_updates.push(order);
            break;
        } else if order.total < remaining {
            details.push(PaymentDetail::new(payment.id, order.code, order.total));
            remaining -= order.total;
            order.total = 0.0;
            order.state = OrderState::Paid;
            order.touch();
            order_updates.push(order);
        } else {
            details.push(PaymentDetail::new(payment.id, order.code, remaining));
            order.total -= remaining;
            order.touch();
            order_updates.push(order);
            break;
        }
    }

    PaymentPlan {
        payment,
        details,
        order_updates,
    }
}

/// Service settling payments against outstanding orders.
pub struct PaymentAllocator<S: Store> {
    store: S,
}

impl<S: Store> PaymentAllocator<S> {
    /// Creates a new payment allocator over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Applies `amount` across the named orders.
    ///
    /// The amount is first checked against the totals of every named
    /// order regardless of state; the request is then rejected unless
    /// every named order exists and is still outstanding. Both passes
    /// read the same fetched set, so a stale total can never slip
    /// between them.
    #[tracing::instrument(skip(self, order_codes), fields(orders = order_codes.len(), amount))]
    pub async fn pay(&self, order_codes: &[OrderCode], amount: f64) -> Result<Payment> {
        let fetched = self
            .store
            .orders_by_codes(order_codes)
            .await
            .map_err(settlement_failure)?;

        let orders_total: f64 = fetched.iter().map(|o| o.total).sum();
        if amount > orders_total {
            return Err(DomainError::Validation(
                "payment value is bigger than orders amounts".to_string(),
            ));
        }

        let outstanding: Vec<Order> = fetched
            .into_iter()
            .filter(|o| o.state.is_payable())
            .collect();
        if outstanding.len() != order_codes.len() {
            return Err(DomainError::Validation(
                "some order codes do not exist or have already been paid".to_string(),
            ));
        }

        let plan = allocate_payment(outstanding, amount);
        let payment = plan.payment.clone();

        let changes = ChangeSet::new()
            .insert_payment(plan.payment)
            .update_orders(plan.order_updates)
            .insert_payment_details(plan.details);

        self.store.commit(changes).await.map_err(settlement_failure)?;

        Ok(payment)
    }
}

fn settlement_failure(e: StoreError) -> DomainError {
    tracing::error!(error = %e, "payment settlement failed");
    if e.is_constraint_violation() {
        DomainError::Validation("error creating a payment".to_string())
    } else {
        DomainError::Validation("generic error".to_string())
    }
}
