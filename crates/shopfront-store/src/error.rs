//! # Storage Error Types
//!
//! Error types for the file-backed adapters.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error / toml::de::Error                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StorageError (this module) ← Adds the file path                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (shopfront-core) ← What the OrderStore port returns        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CoreError::Persistence ← Raised by checkout after a captured payment  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use shopfront_core::{StoreError, ValidationError};
use thiserror::Error;

/// Adapter-level errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing a file failed.
    ///
    /// ## When This Occurs
    /// - Parent directory missing or read-only
    /// - Disk full
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An order snapshot could not be encoded or decoded.
    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An order snapshot was written by a different layout version.
    #[error("Snapshot {path} has version {found}, expected {expected}")]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    /// A seed file is not valid TOML or does not match the seed layout.
    #[error("Seed file is malformed: {0}")]
    SeedFormat(#[from] toml::de::Error),

    /// A seed entry parsed but describes an invalid product.
    #[error("Seed entry '{sku}' is invalid: {source}")]
    InvalidSeed {
        sku: String,
        #[source]
        source: ValidationError,
    },
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convert storage errors to the port's error type.
///
/// ## Error Mapping
/// ```text
/// StorageError::Io             → StoreError::Unavailable
/// StorageError::Serialization  → StoreError::Corrupted
/// StorageError::UnsupportedVersion → StoreError::Corrupted
/// StorageError::SeedFormat     → StoreError::Corrupted
/// StorageError::InvalidSeed    → StoreError::Corrupted
/// ```
impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io { .. } => StoreError::Unavailable(err.to_string()),
            StorageError::Serialization(_)
            | StorageError::UnsupportedVersion { .. }
            | StorageError::SeedFormat(_)
            | StorageError::InvalidSeed { .. } => StoreError::Corrupted(err.to_string()),
        }
    }
}

/// Result type for adapter operations.
pub type StorageResult<T> = Result<T, StorageError>;
