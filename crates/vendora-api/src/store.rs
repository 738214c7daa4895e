//! # In-Memory Order Store
//!
//! `OrderStore` implementation backed by a `RwLock`ed map. Suitable for
//! development and tests; production deployments wire a durable store
//! behind the same port.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use vendora_core::{Order, OrderStore, PaymentError};

/// In-memory order storage
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<i64, Order>>,
    next_id: AtomicI64,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: &Order) -> Result<i64, PaymentError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut stored = order.clone();
        stored.id = Some(id);
        self.orders.write().await.insert(id, stored);
        Ok(id)
    }

    async fn find(&self, id: i64) -> Result<Option<Order>, PaymentError> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Order>, PaymentError> {
        // Pending orders all share the empty transaction id; never match it.
        if transaction_id.is_empty() {
            return Ok(None);
        }
        Ok(self
            .orders
            .read()
            .await
            .values()
            .find(|o| o.transaction_id() == transaction_id)
            .cloned())
    }

    async fn update(&self, order: &Order) -> Result<(), PaymentError> {
        let id = order
            .id
            .ok_or_else(|| PaymentError::Storage("cannot update an unsaved order".to_string()))?;

        let mut orders = self.orders.write().await;
        match orders.get_mut(&id) {
            Some(stored) => {
                *stored = order.clone();
                Ok(())
            }
            None => Err(PaymentError::Storage(format!("order {id} not found"))),
        }
    }
}
