//! # In-Memory Inventory
//!
//! Stock counters keyed by SKU.
//!
//! ## Reserve / Release
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Counter Operations                                   │
//! │                                                                         │
//! │  initialize_stock(sku, n)   available = n                              │
//! │  reserve(sku, q)            q <= 0        → Err(Validation)            │
//! │                             q > available → Err(InsufficientStock)     │
//! │                             else          available -= q               │
//! │  release(sku, q)            q <= 0        → Err(Validation)            │
//! │                             else          available += q               │
//! │  try_reserve(sku, q)        reserve under one lock, bool result        │
//! │                                                                         │
//! │  One Mutex guards the whole map, so check-and-take is atomic.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use shopfront_core::{CoreError, CoreResult, InventoryGate, Quantity};
use tracing::debug;

#[derive(Debug, Default)]
pub struct InMemoryInventory {
    stock: Mutex<HashMap<String, u32>>,
}

impl InMemoryInventory {
    pub fn new() -> Self {
        InMemoryInventory::default()
    }

    /// Sets the available quantity for `sku`, replacing any previous value.
    pub fn initialize_stock(&self, sku: impl Into<String>, quantity: u32) {
        let sku = sku.into();
        debug!(sku = %sku, quantity, "Stock initialized");
        self.stock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(sku, quantity);
    }

    fn take(stock: &mut HashMap<String, u32>, sku: &str, quantity: Quantity) -> CoreResult<()> {
        let available = stock.get(sku).copied().unwrap_or(0);
        if quantity.get() > available {
            return Err(CoreError::InsufficientStock {
                sku: sku.to_string(),
                available: u64::from(available),
                requested: u64::from(quantity.get()),
            });
        }
        stock.insert(sku.to_string(), available - quantity.get());
        Ok(())
    }
}

impl InventoryGate for InMemoryInventory {
    fn available_quantity(&self, sku: &str) -> u32 {
        self.stock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(sku)
            .copied()
            .unwrap_or(0)
    }

    fn reserve(&self, sku: &str, quantity: i64) -> CoreResult<()> {
        let quantity = Quantity::new(quantity)?;
        let mut stock = self.stock.lock().unwrap_or_else(PoisonError::into_inner);
        Self::take(&mut stock, sku, quantity)?;
        debug!(sku, quantity = quantity.get(), "Stock reserved");
        Ok(())
    }

    fn release(&self, sku: &str, quantity: i64) -> CoreResult<()> {
        let quantity = Quantity::new(quantity)?;
        let mut stock = self.stock.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = stock.entry(sku.to_string()).or_insert(0);
        *entry = entry.saturating_add(quantity.get());
        debug!(sku, quantity = quantity.get(), available = *entry, "Stock released");
        Ok(())
    }

    fn try_reserve(&self, sku: &str, quantity: i64) -> bool {
        let Ok(quantity) = Quantity::new(quantity) else {
            return false;
        };
        let mut stock = self.stock.lock().unwrap_or_else(PoisonError::into_inner);
        Self::take(&mut stock, sku, quantity).is_ok()
    }
}
