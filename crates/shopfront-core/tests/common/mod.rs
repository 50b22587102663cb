//! Test doubles for the collaborator ports.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use shopfront_core::{
    Catalog, CoreResult, GatewayError, InventoryGate, Money, Order, OrderStore, PaymentGateway,
    PaymentResult, Product, StoreError,
};

pub fn money(s: &str) -> Money {
    Money::parse(s).unwrap()
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Default)]
pub struct TestCatalog {
    products: HashMap<String, Product>,
}

impl TestCatalog {
    pub fn with(products: &[(&str, &str)]) -> Arc<Self> {
        let products = products
            .iter()
            .map(|(sku, price)| {
                let product = Product::new(*sku, format!("Product {}", sku), money(price)).unwrap();
                (sku.to_string(), product)
            })
            .collect();
        Arc::new(TestCatalog { products })
    }

    /// The reference catalog used by the multi-line scenario.
    pub fn reference() -> Arc<Self> {
        TestCatalog::with(&[("SKU-A", "1500"), ("SKU-B", "50"), ("SKU-C", "150")])
    }
}

impl Catalog for TestCatalog {
    fn lookup(&self, sku: &str) -> Option<Product> {
        self.products.get(sku).cloned()
    }
}

// =============================================================================
// Inventory
// =============================================================================

pub struct TestInventory {
    stock: Mutex<HashMap<String, u32>>,
}

impl TestInventory {
    pub fn with(stock: &[(&str, u32)]) -> Arc<Self> {
        let stock = stock.iter().map(|(sku, qty)| (sku.to_string(), *qty)).collect();
        Arc::new(TestInventory {
            stock: Mutex::new(stock),
        })
    }
}

impl InventoryGate for TestInventory {
    fn available_quantity(&self, sku: &str) -> u32 {
        self.stock.lock().unwrap().get(sku).copied().unwrap_or(0)
    }

    fn reserve(&self, _sku: &str, _quantity: i64) -> CoreResult<()> {
        unimplemented!("not used by the core")
    }

    fn release(&self, _sku: &str, _quantity: i64) -> CoreResult<()> {
        unimplemented!("not used by the core")
    }

    fn try_reserve(&self, _sku: &str, _quantity: i64) -> bool {
        unimplemented!("not used by the core")
    }
}

// =============================================================================
// Payment Gateway
// =============================================================================

pub enum GatewayBehavior {
    Approve,
    Decline(&'static str),
    Fault(&'static str),
    BlankTransaction,
}

/// Scripted gateway that records every charge it receives.
pub struct TestGateway {
    behavior: GatewayBehavior,
    charges: Mutex<Vec<(Money, String)>>,
    next_id: AtomicUsize,
}

impl TestGateway {
    pub fn new(behavior: GatewayBehavior) -> Arc<Self> {
        Arc::new(TestGateway {
            behavior,
            charges: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
        })
    }

    pub fn charges(&self) -> Vec<(Money, String)> {
        self.charges.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.charges.lock().unwrap().len()
    }
}

impl PaymentGateway for TestGateway {
    fn charge(&self, amount: Money, token: &str) -> Result<PaymentResult, GatewayError> {
        self.charges.lock().unwrap().push((amount, token.to_string()));
        match self.behavior {
            GatewayBehavior::Approve => {
                let n = self.next_id.fetch_add(1, Ordering::SeqCst);
                Ok(PaymentResult::success(format!("txn_{}", n)).unwrap())
            }
            GatewayBehavior::Decline(message) => Ok(PaymentResult::failure(message).unwrap()),
            GatewayBehavior::Fault(message) => Err(GatewayError::new(message)),
            GatewayBehavior::BlankTransaction => Ok(PaymentResult::Success {
                transaction_id: "  ".to_string(),
            }),
        }
    }
}

// =============================================================================
// Order Store
// =============================================================================

#[derive(Default)]
pub struct TestStore {
    orders: Mutex<HashMap<String, Order>>,
    fail_saves: bool,
}

impl TestStore {
    pub fn new() -> Arc<Self> {
        Arc::new(TestStore::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(TestStore {
            orders: Mutex::new(HashMap::new()),
            fail_saves: true,
        })
    }

    pub fn len(&self) -> usize {
        self.orders.lock().unwrap().len()
    }
}

impl OrderStore for TestStore {
    fn save(&self, order: Order) -> Result<(), StoreError> {
        if self.fail_saves {
            return Err(StoreError::Unavailable("disk full".to_string()));
        }
        self.orders
            .lock()
            .unwrap()
            .insert(order.order_id().to_string(), order);
        Ok(())
    }

    fn get_by_id(&self, order_id: &str) -> Result<Option<Order>, StoreError> {
        Ok(self.orders.lock().unwrap().get(order_id).cloned())
    }

    fn get_all(&self) -> Result<Vec<Order>, StoreError> {
        Ok(self.orders.lock().unwrap().values().cloned().collect())
    }
}
