//! # Order Store Port
//!
//! Persistence boundary for orders. The payment subsystem never talks to a
//! database directly; collaborators inject an implementation of this trait
//! (the API crate ships an in-memory one, production wires a real store).

use crate::error::PaymentError;
use crate::order::Order;
use async_trait::async_trait;

/// Durable storage for orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a new order and return its assigned id.
    async fn insert(&self, order: &Order) -> Result<i64, PaymentError>;

    /// Look up an order by id.
    async fn find(&self, id: i64) -> Result<Option<Order>, PaymentError>;

    /// Look up an order by provider transaction id. Webhook handlers use
    /// this to reconcile an inbound payload with the order it paid for.
    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Order>, PaymentError>;

    /// Persist changes to an existing order (status, transaction id, total).
    async fn update(&self, order: &Order) -> Result<(), PaymentError>;
}
