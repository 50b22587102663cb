//! # In-Memory Order Store

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use shopfront_core::{Order, OrderStore, StoreError};
use tracing::debug;

#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<String, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        InMemoryOrderStore::default()
    }

    pub fn len(&self) -> usize {
        self.orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OrderStore for InMemoryOrderStore {
    fn save(&self, order: Order) -> Result<(), StoreError> {
        debug!(order_id = order.order_id(), total = %order.total(), "Saving order");
        self.orders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(order.order_id().to_string(), order);
        Ok(())
    }

    fn get_by_id(&self, order_id: &str) -> Result<Option<Order>, StoreError> {
        if order_id.trim().is_empty() {
            return Ok(None);
        }
        Ok(self
            .orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(order_id)
            .cloned())
    }

    fn get_all(&self) -> Result<Vec<Order>, StoreError> {
        Ok(self
            .orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect())
    }
}
