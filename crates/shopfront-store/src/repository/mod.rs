//! # Order Repositories
//!
//! Implementations of the `OrderStore` port.
//!
//! ## Store Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    OrderStore Contract                                  │
//! │                                                                         │
//! │  CheckoutService                                                       │
//! │       │                                                                 │
//! │       │  store.save(order)                                             │
//! │       ▼                                                                 │
//! │  OrderStore                                                            │
//! │  ├── save(order)                   upsert by order id, last wins       │
//! │  ├── get_by_id(id)                 None when unknown or blank          │
//! │  ├── get_all()                     snapshot, unordered                 │
//! │  └── get_by_date_range(start, end) inclusive, newest first             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  HashMap (memory)  or  HashMap + JSON snapshot file (json)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`InMemoryOrderStore`] - Process-local, lost on exit
//! - [`JsonFileOrderStore`] - Survives restarts via a JSON snapshot file

pub mod json;
pub mod memory;

pub use json::JsonFileOrderStore;
pub use memory::InMemoryOrderStore;
