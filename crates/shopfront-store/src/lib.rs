//! # shopfront-store: Collaborator Adapters for Shopfront
//!
//! Concrete implementations of the ports declared in `shopfront_core::ports`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shopfront Data Flow                              │
//! │                                                                         │
//! │  seed.toml ──► SeedFile::apply                                         │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  shopfront-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────────┐  ┌────────────────┐  ┌─────────────────┐  │   │
//! │  │   │ InMemoryCatalog│  │InMemoryInventory│ │  repository     │  │   │
//! │  │   │  impl Catalog  │  │impl InventoryGate││  memory / json  │  │   │
//! │  │   └───────┬────────┘  └───────┬────────┘  └────────┬────────┘  │   │
//! │  └───────────┼───────────────────┼────────────────────┼───────────┘   │
//! │              ▼                   ▼                    ▼                │
//! │            Cart ◄──────────────────                 CheckoutService    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`catalog`] - In-memory product catalog
//! - [`inventory`] - In-memory stock counters with atomic reserve
//! - [`repository`] - Order stores (memory, JSON file)
//! - [`seed`] - TOML seed files for catalog and stock
//! - [`error`] - Adapter error types
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use shopfront_core::{Cart, Money, Product};
//! use shopfront_store::{InMemoryCatalog, InMemoryInventory};
//!
//! let catalog = Arc::new(InMemoryCatalog::new());
//! catalog.add_product(Product::new("SKU-A", "Laptop", Money::from_whole(1500)).unwrap());
//!
//! let inventory = Arc::new(InMemoryInventory::new());
//! inventory.initialize_stock("SKU-A", 3);
//!
//! let mut cart = Cart::new(catalog).with_inventory(inventory);
//! cart.add_item("SKU-A", 2).unwrap();
//! assert!(cart.add_item("SKU-A", 2).is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod inventory;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::InMemoryCatalog;
pub use error::{StorageError, StorageResult};
pub use inventory::InMemoryInventory;
pub use repository::{InMemoryOrderStore, JsonFileOrderStore};
pub use seed::{SeedFile, SeedProduct};
