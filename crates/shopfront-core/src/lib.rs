//! # shopfront-core: Pricing & Checkout Logic for Shopfront
//!
//! This crate is the **heart** of Shopfront. It owns the pricing-and-checkout
//! pipeline and talks to the outside world only through the traits in
//! [`ports`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shopfront Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    shopfront-cli                                │   │
//! │  │    config ──► seed catalog ──► fill cart ──► checkout ──► print │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ shopfront-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  money   │ │   cart   │ │ discount │ │    checkout      │  │   │
//! │  │   │  types   │ │          │ │  engine  │ │  validate→pay→   │  │   │
//! │  │   │  order   │ │          │ │  rules   │ │  order→persist   │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ports: Catalog • InventoryGate • PaymentGateway • OrderStore  │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 shopfront-store (Adapters)                      │   │
//! │  │        in-memory catalog/inventory, memory & JSON order stores  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Value types and records (Quantity, Product, LineItem, results)
//! - [`money`] - Exact decimal money
//! - [`error`] - Domain error types
//! - [`validation`] - Field validators and the pre-checkout cart gate
//! - [`discount`] - Discount rules and the engine aggregating them
//! - [`cart`] - The cart and its derived totals
//! - [`order`] - Immutable order records
//! - [`ports`] - Collaborator traits
//! - [`checkout`] - The checkout pipeline
//!
//! ## Design Principles
//!
//! 1. **Derived, never stored**: subtotal, discount and total are recomputed
//!    from the current items every time
//! 2. **Exact Money**: base-10 decimals, no rounding anywhere in pricing
//! 3. **Typed outcomes**: a declined payment or an invalid cart is a
//!    `CheckoutResult::Failure`, not an error
//! 4. **Validated construction**: invalid records cannot be built
//!
//! ## Example Usage
//!
//! ```rust
//! use shopfront_core::discount::DiscountEngine;
//! use shopfront_core::types::{LineItem, Product, Quantity};
//! use shopfront_core::Money;
//!
//! let bolts = Product::new("SKU-B", "Bolts", Money::from_whole(50)).unwrap();
//! let items = vec![LineItem::from_product(&bolts, Quantity::new(12).unwrap()).unwrap()];
//!
//! // 12 units qualify for the 10% bulk discount: 600 × 10% = 60
//! let engine = DiscountEngine::standard();
//! let discount = engine.calculate_discount(&items, Money::from_whole(600));
//! assert_eq!(discount, Money::from_whole(60));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod discount;
pub mod error;
pub mod money;
pub mod order;
pub mod ports;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartTotals};
pub use checkout::CheckoutService;
pub use discount::{BulkDiscountRule, DiscountEngine, DiscountRule, OrderDiscountRule};
pub use error::{CoreError, CoreResult, GatewayError, StoreError, ValidationError};
pub use money::Money;
pub use order::{Order, OrderDraft, OrderLineItem, OrderStatus};
pub use ports::{Catalog, InventoryGate, OrderStore, PaymentGateway};
pub use types::*;
