//! # Cart
//!
//! Mutable accumulator of line items for one customer session.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  add_item(sku, qty)                                                    │
//! │    │                                                                    │
//! │    ├── qty <= 0 ? ───────────────────────► Err(Validation)             │
//! │    ├── catalog.lookup(sku) == None ? ────► Err(ProductNotFound)        │
//! │    ├── in_cart + qty > available ? ──────► Err(InsufficientStock)      │
//! │    │   (read only, the gate is never reserved against)                 │
//! │    └── existing line ? qty += n : push new line (price frozen)         │
//! │                                                                         │
//! │  remove_item(sku)        idempotent, absent sku is a no-op             │
//! │  clear()                 integrator policy, never automatic            │
//! │                                                                         │
//! │  Derived values are NEVER stored:                                      │
//! │    subtotal = Σ line_total                                             │
//! │    discount = engine(items, subtotal)  or 0 without an engine          │
//! │    total    = subtotal - discount      (not clamped)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart is owned by a single session. It holds no locks; callers that
//! share one across threads wrap it themselves.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::discount::DiscountEngine;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::ports::{Catalog, InventoryGate};
use crate::types::{DiscountApplication, LineItem, Quantity};
use crate::validation::validate_sku;

/// Subtotal, discount, total and itemized discounts captured in one read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub applied_discounts: Vec<DiscountApplication>,
}

/// The shopping cart.
///
/// ## Invariants
/// - Line items are unique by SKU (adding a present SKU increments it)
/// - Every line has quantity > 0; removal deletes the line
/// - Insertion order is kept for display and order-line ordering
pub struct Cart {
    catalog: Arc<dyn Catalog>,
    inventory: Option<Arc<dyn InventoryGate>>,
    discounts: Option<Arc<DiscountEngine>>,
    items: Vec<LineItem>,
}

impl Cart {
    /// Creates an empty cart with no inventory gate and no discounts.
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Cart {
            catalog,
            inventory: None,
            discounts: None,
            items: Vec::new(),
        }
    }

    /// Enforces availability against `inventory` on every add.
    pub fn with_inventory(mut self, inventory: Arc<dyn InventoryGate>) -> Self {
        self.inventory = Some(inventory);
        self
    }

    /// Prices the cart through `discounts`.
    pub fn with_discounts(mut self, discounts: Arc<DiscountEngine>) -> Self {
        self.discounts = Some(discounts);
        self
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Adds `quantity` units of `sku`, or increases the quantity if present.
    ///
    /// ## Errors
    /// - `Validation` for `quantity <= 0` or a blank SKU
    /// - `ProductNotFound` when the catalog does not know the SKU
    /// - `InsufficientStock` when the cart's running quantity for the SKU
    ///   plus `quantity` exceeds what the inventory gate reports right now
    /// - `Validation` (`Overflow`) when the line total or the cart subtotal
    ///   would no longer fit in a decimal
    ///
    /// A failed call leaves the cart unchanged.
    pub fn add_item(&mut self, sku: &str, quantity: i64) -> CoreResult<()> {
        let quantity = Quantity::new(quantity)?;
        validate_sku(sku)?;

        let product = self
            .catalog
            .lookup(sku)
            .ok_or_else(|| CoreError::ProductNotFound(sku.to_string()))?;

        if let Some(inventory) = &self.inventory {
            let available = u64::from(inventory.available_quantity(product.sku()));
            let requested = u64::from(self.quantity_of(product.sku())) + u64::from(quantity.get());
            if requested > available {
                debug!(sku = product.sku(), requested, available, "Add rejected, not enough stock");
                return Err(CoreError::InsufficientStock {
                    sku: product.sku().to_string(),
                    available,
                    requested,
                });
            }
        }

        let position = self.items.iter().position(|item| item.sku() == product.sku());
        let line = match position {
            Some(index) => {
                let mut line = self.items[index].clone();
                line.add_quantity(quantity)?;
                line
            }
            None => LineItem::from_product(&product, quantity)?,
        };

        // The subtotal must stay representable, every later sum relies on it
        self.items
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != position)
            .try_fold(line.line_total(), |acc, (_, item)| acc.checked_add(item.line_total()))
            .map_err(|_| ValidationError::overflow("subtotal"))?;

        match position {
            Some(index) => {
                debug!(sku = line.sku(), quantity = line.quantity().get(), "Cart line incremented");
                self.items[index] = line;
            }
            None => {
                debug!(sku = line.sku(), quantity = line.quantity().get(), price = %line.unit_price(), "Cart line added");
                self.items.push(line);
            }
        }

        Ok(())
    }

    /// Removes the line for `sku`. Returns whether a line was removed;
    /// removing an absent SKU is not an error.
    pub fn remove_item(&mut self, sku: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.sku() != sku);
        let removed = self.items.len() != before;
        if removed {
            debug!(sku, "Cart line removed");
        }
        removed
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        debug!(lines = self.items.len(), "Cart cleared");
        self.items.clear();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct SKUs.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Units across all lines.
    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity().get()))
            .sum()
    }

    /// Units of `sku` currently in the cart, `0` when absent.
    pub fn quantity_of(&self, sku: &str) -> u32 {
        self.items
            .iter()
            .find(|item| item.sku() == sku)
            .map_or(0, |item| item.quantity().get())
    }

    pub fn calculate_subtotal(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Zero without a discount engine.
    pub fn calculate_discount(&self) -> Money {
        match &self.discounts {
            Some(engine) => engine.calculate_discount(&self.items, self.calculate_subtotal()),
            None => Money::zero(),
        }
    }

    /// `subtotal - discount`. May be negative when rules over-discount.
    pub fn calculate_total(&self) -> Money {
        self.calculate_subtotal() - self.calculate_discount()
    }

    pub fn applied_discounts(&self) -> Vec<DiscountApplication> {
        match &self.discounts {
            Some(engine) => engine.applied_discounts(&self.items, self.calculate_subtotal()),
            None => Vec::new(),
        }
    }

    /// Derives every aggregate from a single pass over the current items.
    pub fn totals(&self) -> CartTotals {
        let subtotal = self.calculate_subtotal();
        let (discount, applied_discounts) = match &self.discounts {
            Some(engine) => (
                engine.calculate_discount(&self.items, subtotal),
                engine.applied_discounts(&self.items, subtotal),
            ),
            None => (Money::zero(), Vec::new()),
        };

        CartTotals {
            subtotal,
            discount,
            total: subtotal - discount,
            applied_discounts,
        }
    }
}

impl fmt::Debug for Cart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cart")
            .field("items", &self.items)
            .field("inventory", &self.inventory.is_some())
            .field("discounts", &self.discounts)
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discount::{BulkDiscountRule, DiscountRule};
    use crate::types::Product;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeCatalog(Mutex<HashMap<String, Product>>);

    impl FakeCatalog {
        fn with(products: &[(&str, &str)]) -> Arc<Self> {
            let map = products
                .iter()
                .map(|(sku, price)| {
                    let product =
                        Product::new(*sku, format!("Product {}", sku), Money::parse(price).unwrap())
                            .unwrap();
                    (sku.to_string(), product)
                })
                .collect();
            Arc::new(FakeCatalog(Mutex::new(map)))
        }

        fn reprice(&self, sku: &str, price: &str) {
            let product =
                Product::new(sku, format!("Product {}", sku), Money::parse(price).unwrap()).unwrap();
            self.0.lock().unwrap().insert(sku.to_string(), product);
        }
    }

    impl Catalog for FakeCatalog {
        fn lookup(&self, sku: &str) -> Option<Product> {
            self.0.lock().unwrap().get(sku).cloned()
        }
    }

    struct FixedStock(u32);

    impl InventoryGate for FixedStock {
        fn available_quantity(&self, _sku: &str) -> u32 {
            self.0
        }

        fn reserve(&self, _sku: &str, _quantity: i64) -> CoreResult<()> {
            panic!("the cart must not reserve stock");
        }

        fn release(&self, _sku: &str, _quantity: i64) -> CoreResult<()> {
            panic!("the cart must not release stock");
        }

        fn try_reserve(&self, _sku: &str, _quantity: i64) -> bool {
            panic!("the cart must not reserve stock");
        }
    }

    /// Always discounts more than anything could cost.
    struct Overdiscount;

    impl DiscountRule for Overdiscount {
        fn name(&self) -> &str {
            "Overdiscount"
        }

        fn calculate(&self, _items: &[LineItem], subtotal: Money) -> Money {
            subtotal + Money::from_whole(10)
        }
    }

    fn money(s: &str) -> Money {
        Money::parse(s).unwrap()
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = Cart::new(FakeCatalog::with(&[]));
        assert!(cart.is_empty());
        assert_eq!(cart.calculate_subtotal(), Money::zero());
        assert_eq!(cart.calculate_discount(), Money::zero());
        assert_eq!(cart.calculate_total(), Money::zero());
        assert!(cart.applied_discounts().is_empty());
    }

    #[test]
    fn test_add_item_and_merge_same_sku() {
        let mut cart = Cart::new(FakeCatalog::with(&[("SKU001", "999.99"), ("SKU002", "2.50")]));

        cart.add_item("SKU001", 1).unwrap();
        cart.add_item("SKU002", 4).unwrap();
        cart.add_item("SKU001", 2).unwrap();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.quantity_of("SKU001"), 3);
        assert_eq!(cart.total_quantity(), 7);
        assert_eq!(cart.items()[0].sku(), "SKU001");
        assert_eq!(cart.items()[1].sku(), "SKU002");
        assert_eq!(cart.calculate_subtotal(), money("3009.97"));
    }

    #[test]
    fn test_add_item_rejects_non_positive_quantity() {
        let mut cart = Cart::new(FakeCatalog::with(&[("SKU001", "1")]));
        assert!(matches!(cart.add_item("SKU001", 0), Err(CoreError::Validation(_))));
        assert!(matches!(cart.add_item("SKU001", -2), Err(CoreError::Validation(_))));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_item_rejects_totals_that_overflow() {
        let max = "79228162514264337593543950335";
        let mut cart = Cart::new(FakeCatalog::with(&[("BIG", max), ("SMALL", "1")]))
            .with_discounts(Arc::new(DiscountEngine::standard()));

        let err = cart.add_item("BIG", 2).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Overflow { .. })));
        assert!(cart.is_empty());

        cart.add_item("BIG", 1).unwrap();
        assert!(matches!(
            cart.add_item("BIG", 1),
            Err(CoreError::Validation(ValidationError::Overflow { .. }))
        ));
        assert_eq!(
            cart.add_item("SMALL", 1).unwrap_err().to_string(),
            "Validation error: subtotal is too large to represent exactly"
        );
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.quantity_of("BIG"), 1);

        // Everything derived from an accepted cart stays computable
        let totals = cart.totals();
        assert_eq!(totals.subtotal, money(max));
        assert!(totals.total.is_positive());
        assert_eq!(totals.total, totals.subtotal - totals.discount);
    }

    #[test]
    fn test_add_item_unknown_sku() {
        let mut cart = Cart::new(FakeCatalog::with(&[]));
        let err = cart.add_item("GHOST", 1).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(ref sku) if sku == "GHOST"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_item_blank_sku() {
        let mut cart = Cart::new(FakeCatalog::with(&[]));
        assert!(matches!(cart.add_item("  ", 1), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_inventory_counts_running_cart_quantity() {
        let mut cart =
            Cart::new(FakeCatalog::with(&[("WIDGET", "5")])).with_inventory(Arc::new(FixedStock(5)));

        cart.add_item("WIDGET", 3).unwrap();
        let err = cart.add_item("WIDGET", 3).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                sku,
                available,
                requested,
            } => {
                assert_eq!(sku, "WIDGET");
                assert_eq!(available, 5);
                assert_eq!(requested, 6);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // The failed call changed nothing and the cart is still usable
        assert_eq!(cart.quantity_of("WIDGET"), 3);
        cart.add_item("WIDGET", 2).unwrap();
        assert_eq!(cart.quantity_of("WIDGET"), 5);
    }

    #[test]
    fn test_unit_price_is_frozen_at_add_time() {
        let catalog = FakeCatalog::with(&[("SKU001", "10")]);
        let mut cart = Cart::new(catalog.clone());

        cart.add_item("SKU001", 1).unwrap();
        catalog.reprice("SKU001", "99");
        cart.add_item("SKU001", 1).unwrap();

        assert_eq!(cart.items()[0].unit_price(), money("10"));
        assert_eq!(cart.calculate_subtotal(), money("20"));
    }

    #[test]
    fn test_remove_item_is_idempotent() {
        let mut cart = Cart::new(FakeCatalog::with(&[("SKU001", "1")]));
        cart.add_item("SKU001", 1).unwrap();

        assert!(cart.remove_item("SKU001"));
        assert!(!cart.remove_item("SKU001"));
        assert!(!cart.remove_item("NEVER-ADDED"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new(FakeCatalog::with(&[("SKU001", "1"), ("SKU002", "2")]));
        cart.add_item("SKU001", 1).unwrap();
        cart.add_item("SKU002", 1).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.calculate_total(), Money::zero());
    }

    #[test]
    fn test_totals_with_discount_engine() {
        let mut engine = DiscountEngine::new();
        engine.add_rule(BulkDiscountRule::default()).unwrap();
        let mut cart =
            Cart::new(FakeCatalog::with(&[("SKU-B", "50")])).with_discounts(Arc::new(engine));

        cart.add_item("SKU-B", 12).unwrap();
        let totals = cart.totals();

        assert_eq!(totals.subtotal, money("600"));
        assert_eq!(totals.discount, money("60"));
        assert_eq!(totals.total, money("540"));
        assert_eq!(totals.total, cart.calculate_total());
        assert_eq!(totals.applied_discounts, cart.applied_discounts());
    }

    #[test]
    fn test_total_is_not_clamped() {
        let mut engine = DiscountEngine::new();
        engine.add_rule(Overdiscount).unwrap();
        let mut cart =
            Cart::new(FakeCatalog::with(&[("SKU001", "5")])).with_discounts(Arc::new(engine));

        cart.add_item("SKU001", 1).unwrap();
        assert_eq!(cart.calculate_total(), Money::zero() - Money::from_whole(10));
    }
}
