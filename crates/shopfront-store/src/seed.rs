//! # Seed Files
//!
//! Loads a catalog and its stock levels from a TOML file.
//!
//! ## Format
//! ```toml
//! [[products]]
//! sku = "SKU-A"
//! name = "Gaming Laptop"
//! price = "1500"
//! stock = 20
//!
//! [[products]]
//! sku = "SKU-B"
//! name = "USB Cable"
//! price = "50"
//! # stock omitted: listed in the catalog, nothing available to sell
//! ```
//!
//! Prices are decimal strings so they stay exact.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use shopfront_core::{Money, Product};
use tracing::info;

use crate::catalog::InMemoryCatalog;
use crate::error::{StorageError, StorageResult};
use crate::inventory::InMemoryInventory;

#[derive(Debug, Clone, Deserialize)]
pub struct SeedProduct {
    pub sku: String,
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub stock: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

impl SeedFile {
    pub fn parse(content: &str) -> StorageResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;
        let seed = SeedFile::parse(&content)?;
        info!(path = %path.display(), products = seed.products.len(), "Seed file loaded");
        Ok(seed)
    }

    /// Validates every entry, then adds the products to `catalog` and the
    /// stock levels to `inventory`. Nothing is applied if any entry is invalid.
    pub fn apply(&self, catalog: &InMemoryCatalog, inventory: &InMemoryInventory) -> StorageResult<()> {
        let products = self
            .products
            .iter()
            .map(|entry| {
                Product::new(entry.sku.as_str(), entry.name.as_str(), entry.price)
                    .map(|product| (product, entry.stock))
                    .map_err(|source| StorageError::InvalidSeed {
                        sku: entry.sku.clone(),
                        source,
                    })
            })
            .collect::<StorageResult<Vec<_>>>()?;

        for (product, stock) in products {
            if let Some(stock) = stock {
                inventory.initialize_stock(product.sku(), stock);
            }
            catalog.add_product(product);
        }
        Ok(())
    }
}
