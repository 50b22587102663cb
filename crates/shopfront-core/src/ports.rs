//! # Collaborator Ports
//!
//! The four external collaborators the pricing-and-checkout core consumes.
//!
//! ## Port Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ports & Adapters                                 │
//! │                                                                         │
//! │   Core (this crate)              Adapters (shopfront-store, CLI)       │
//! │   ─────────────────              ───────────────────────────────       │
//! │   Cart ─────────► Catalog        ◄── InMemoryCatalog                   │
//! │   Cart ─────────► InventoryGate  ◄── InMemoryInventory                 │
//! │   Checkout ─────► PaymentGateway ◄── SimulatedGateway / real PSP       │
//! │   Checkout ─────► OrderStore     ◄── InMemoryOrderStore                │
//! │                                      JsonFileOrderStore                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All calls are blocking with a single result. Methods take `&self`;
//! adapters with mutable state provide their own interior synchronisation.

use chrono::{DateTime, Utc};

use crate::error::{CoreResult, GatewayError, StoreError};
use crate::money::Money;
use crate::order::Order;
use crate::types::{PaymentResult, Product};

/// Resolves a SKU to the product's current snapshot.
pub trait Catalog: Send + Sync {
    /// Returns `None` for an unknown SKU. Never fails.
    fn lookup(&self, sku: &str) -> Option<Product>;
}

/// Live stock counters.
pub trait InventoryGate: Send + Sync {
    /// Units currently available. `0` for an unknown SKU.
    fn available_quantity(&self, sku: &str) -> u32;

    /// Takes `quantity` units out of the available pool.
    ///
    /// Fails with a validation error for `quantity <= 0` and with
    /// `InsufficientStock` when `quantity` exceeds what is available.
    fn reserve(&self, sku: &str, quantity: i64) -> CoreResult<()>;

    /// Returns `quantity` units to the available pool. Fails for `quantity <= 0`.
    fn release(&self, sku: &str, quantity: i64) -> CoreResult<()>;

    /// Atomic check-and-reserve. Returns `false` and changes nothing when the
    /// units are not available.
    fn try_reserve(&self, sku: &str, quantity: i64) -> bool;
}

/// Opaque charge function of a payment service provider.
pub trait PaymentGateway: Send + Sync {
    /// Charges `amount` against `token`.
    ///
    /// A declined card is `Ok(PaymentResult::Failure { .. })`; an `Err` is a
    /// fault (timeout, transport error) and the pipeline downgrades it to a
    /// failed payment.
    fn charge(&self, amount: Money, token: &str) -> Result<PaymentResult, GatewayError>;
}

/// Upsert-by-id order persistence.
pub trait OrderStore: Send + Sync {
    /// Saves `order` keyed by its id. Saving the same id again overwrites.
    fn save(&self, order: Order) -> Result<(), StoreError>;

    /// Returns the order, or `None` when unknown. A blank id is `None`.
    fn get_by_id(&self, order_id: &str) -> Result<Option<Order>, StoreError>;

    /// Full snapshot, no ordering guarantee.
    fn get_all(&self) -> Result<Vec<Order>, StoreError>;

    /// Orders created within `[start, end]` (both inclusive), newest first.
    fn get_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Order>, StoreError> {
        let mut orders: Vec<Order> = self
            .get_all()?
            .into_iter()
            .filter(|order| order.created_at() >= start && order.created_at() <= end)
            .collect();
        orders.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(orders)
    }
}
