//! # Error Types
//!
//! Domain-specific error types for shopfront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shopfront-core errors (this file)                                     │
//! │  ├── ValidationError  - Malformed input (empty id, qty <= 0, ...)      │
//! │  ├── CoreError        - Cart mutation / persistence failures           │
//! │  ├── GatewayError     - Fault raised by a payment gateway              │
//! │  └── StoreError       - Fault raised by an order store                 │
//! │                                                                         │
//! │  shopfront-store errors (separate crate)                               │
//! │  └── StorageError     - I/O and serialization failures → StoreError    │
//! │                                                                         │
//! │  NOT errors: a declined payment or an invalid cart. Those are the      │
//! │  Failure arms of PaymentResult / CheckoutResult.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised immediately when a caller breaks a constructor or operation contract.
/// Never recovered from inside the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be greater than zero")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// An amount exceeds what an exact decimal can hold.
    #[error("{field} is too large to represent exactly")]
    Overflow { field: String },

    /// Invalid format (e.g. unparsable decimal).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Values that must agree with each other do not.
    ///
    /// ## When This Occurs
    /// - An order whose total is not exactly `subtotal - discount`
    #[error("{field} is inconsistent: {reason}")]
    Inconsistent { field: String, reason: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    pub fn must_be_positive(field: impl Into<String>) -> Self {
        ValidationError::MustBePositive {
            field: field.into(),
        }
    }

    pub fn negative(field: impl Into<String>) -> Self {
        ValidationError::Negative {
            field: field.into(),
        }
    }

    pub fn overflow(field: impl Into<String>) -> Self {
        ValidationError::Overflow {
            field: field.into(),
        }
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The catalog has no product for the requested SKU.
    #[error("Product with SKU '{0}' not found in catalog")]
    ProductNotFound(String),

    /// Cart quantity for a SKU would exceed what the inventory gate reports.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart already holds 3 × WIDGET, gate reports 5 available
    ///      │
    ///      ▼
    /// add_item("WIDGET", 4)   → requested = 3 + 4 = 7
    ///      │
    ///      ▼
    /// InsufficientStock { sku: "WIDGET", available: 5, requested: 7 }
    /// ```
    /// Only the offending `add_item` call fails; the cart stays usable.
    #[error("Insufficient inventory for SKU '{sku}'. Requested: {requested}, Available: {available}")]
    InsufficientStock {
        sku: String,
        available: u64,
        requested: u64,
    },

    /// The order store failed after the payment was captured.
    ///
    /// This is the dangerous partial-failure state: money has been taken
    /// but the order is not recorded. It carries both identifiers so the
    /// caller can refund or retry the save.
    #[error("Order {order_id} was charged (transaction {transaction_id}) but could not be saved: {source}")]
    Persistence {
        order_id: String,
        transaction_id: String,
        #[source]
        source: StoreError,
    },

    /// The payment was captured but the order record could not be built.
    ///
    /// Same partial-failure state as `Persistence`, one step earlier.
    #[error("Order {order_id} was charged (transaction {transaction_id}) but could not be recorded: {source}")]
    OrderRecord {
        order_id: String,
        transaction_id: String,
        #[source]
        source: ValidationError,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns true for the variants a caller can surface as "fix your input".
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            CoreError::Validation(_)
                | CoreError::ProductNotFound(_)
                | CoreError::InsufficientStock { .. }
        )
    }
}

// =============================================================================
// Collaborator Faults
// =============================================================================

/// A fault raised by a payment gateway (timeout, transport error, ...).
///
/// The checkout pipeline never lets this escape: it is converted into
/// `PaymentResult::Failure` carrying the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GatewayError {
    pub message: String,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        GatewayError {
            message: message.into(),
        }
    }
}

/// A fault raised by an order store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend could not be reached or written.
    #[error("Order store unavailable: {0}")]
    Unavailable(String),

    /// Stored data could not be read back.
    #[error("Order store data is corrupted: {0}")]
    Corrupted(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            sku: "SKU001".to_string(),
            available: 5,
            requested: 10,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient inventory for SKU 'SKU001'. Requested: 10, Available: 5"
        );

        let err = CoreError::ProductNotFound("NOPE".to_string());
        assert_eq!(err.to_string(), "Product with SKU 'NOPE' not found in catalog");
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("sku").to_string(), "sku is required");
        assert_eq!(
            ValidationError::must_be_positive("quantity").to_string(),
            "quantity must be greater than zero"
        );
        assert_eq!(
            ValidationError::negative("price").to_string(),
            "price cannot be negative"
        );
        assert_eq!(
            ValidationError::overflow("subtotal").to_string(),
            "subtotal is too large to represent exactly"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("sku").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert!(core_err.is_caller_error());
    }

    #[test]
    fn test_persistence_error_is_not_caller_error() {
        let err = CoreError::Persistence {
            order_id: "ORD-1".to_string(),
            transaction_id: "txn_1".to_string(),
            source: StoreError::Unavailable("disk full".to_string()),
        };
        assert!(!err.is_caller_error());
        assert!(err.to_string().contains("txn_1"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_order_record_error_keeps_both_ids() {
        let err = CoreError::OrderRecord {
            order_id: "ORD-1".to_string(),
            transaction_id: "txn_9".to_string(),
            source: ValidationError::negative("total"),
        };
        assert!(!err.is_caller_error());
        let message = err.to_string();
        assert!(message.contains("ORD-1"));
        assert!(message.contains("txn_9"));
        assert!(message.contains("total cannot be negative"));
    }
}
