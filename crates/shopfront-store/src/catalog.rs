//! # In-Memory Catalog
//!
//! A `Catalog` backed by a map of SKU to product.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use shopfront_core::{Catalog, Product};
use tracing::debug;

/// Product lookup by SKU. Adding an existing SKU replaces the product.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<String, Product>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        InMemoryCatalog::default()
    }

    /// Inserts or replaces the product keyed by its SKU.
    pub fn add_product(&self, product: Product) {
        debug!(sku = product.sku(), price = %product.price(), "Catalog product added");
        self.products
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(product.sku().to_string(), product);
    }

    pub fn len(&self) -> usize {
        self.products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every product, sorted by SKU.
    pub fn products(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        products.sort_by(|a, b| a.sku().cmp(b.sku()));
        products
    }
}

impl Catalog for InMemoryCatalog {
    fn lookup(&self, sku: &str) -> Option<Product> {
        self.products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(sku)
            .cloned()
    }
}
