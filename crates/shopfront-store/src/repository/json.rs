//! # JSON File Order Store
//!
//! Keeps every order in memory and mirrors the whole set to one JSON file.
//!
//! ## Save Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    save(order)                                          │
//! │                                                                         │
//! │  write lock ──► snapshot = current orders + order                      │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │              orders.json.tmp  (serde_json, pretty)                     │
//! │                      │                                                  │
//! │                      ▼ rename                                           │
//! │                 orders.json                                             │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │              map.insert(order) ──► unlock                               │
//! │                                                                         │
//! │  A failed write leaves both the file and the map untouched.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use shopfront_core::{Order, OrderStore, StoreError};
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};

/// Current snapshot layout version.
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    orders: Vec<Order>,
}

/// Read before the full snapshot so another layout is reported as such.
#[derive(Deserialize)]
struct SnapshotHeader {
    version: u32,
}

#[derive(Debug)]
pub struct JsonFileOrderStore {
    path: PathBuf,
    orders: RwLock<HashMap<String, Order>>,
}

impl JsonFileOrderStore {
    /// Opens the store at `path`, loading existing orders. A missing file is
    /// an empty store; the file is created on the first save.
    ///
    /// Fails when the file has another snapshot version or holds an order
    /// that breaks the `Order` invariants.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let orders = match fs::read_to_string(&path) {
            Ok(content) => {
                let header: SnapshotHeader = serde_json::from_str(&content)?;
                if header.version != SNAPSHOT_VERSION {
                    return Err(StorageError::UnsupportedVersion {
                        path,
                        found: header.version,
                        expected: SNAPSHOT_VERSION,
                    });
                }
                // Orders deserialize through their validating constructors
                let snapshot: Snapshot = serde_json::from_str(&content)?;
                snapshot
                    .orders
                    .into_iter()
                    .map(|order| (order.order_id().to_string(), order))
                    .collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(StorageError::io(&path, e)),
        };

        info!(path = %path.display(), orders = orders.len(), "Order store opened");
        Ok(JsonFileOrderStore {
            path,
            orders: RwLock::new(orders),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_snapshot(&self, orders: &HashMap<String, Order>) -> StorageResult<()> {
        let mut orders: Vec<Order> = orders.values().cloned().collect();
        orders.sort_by(|a, b| a.order_id().cmp(b.order_id()));
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            orders,
        };
        let json = serde_json::to_string_pretty(&snapshot)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| StorageError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StorageError::io(&self.path, e))?;
        Ok(())
    }
}

impl OrderStore for JsonFileOrderStore {
    fn save(&self, order: Order) -> Result<(), StoreError> {
        let mut orders = self.orders.write().unwrap_or_else(PoisonError::into_inner);

        let mut next = orders.clone();
        let order_id = order.order_id().to_string();
        next.insert(order_id.clone(), order);
        self.write_snapshot(&next)?;

        *orders = next;
        debug!(order_id = %order_id, path = %self.path.display(), "Order written to snapshot");
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
