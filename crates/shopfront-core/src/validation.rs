//! # Validation Module
//!
//! Input validators and the pre-checkout cart gate.
//!
//! ## Two Kinds of "Invalid"
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Field validators (validate_*)                                         │
//! │  ├── Caller contract: blank sku, blank name, ...                       │
//! │  └── Return Err(ValidationError) immediately                           │
//! │                                                                         │
//! │  CartValidator                                                          │
//! │  ├── Business state: missing cart, empty cart, total <= 0              │
//! │  └── Returns CartValidation::Invalid { reason } - never an error,      │
//! │      the checkout pipeline routes the reason to the customer           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use crate::cart::Cart;
use crate::error::{ValidationError, ValidationResult};

/// Longest accepted SKU.
pub const MAX_SKU_LEN: usize = 64;

/// Longest accepted product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be blank
/// - At most [`MAX_SKU_LEN`] characters
///
/// ## Example
/// ```rust
/// use shopfront_core::validation::validate_sku;
///
/// assert!(validate_sku("LAPTOP-001").is_ok());
/// assert!(validate_sku("   ").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::required("sku"));
    }

    if sku.chars().count() > MAX_SKU_LEN {
        return Err(ValidationError::OutOfRange {
            field: "sku length".to_string(),
            min: 1,
            max: MAX_SKU_LEN as i64,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be blank
/// - At most [`MAX_PRODUCT_NAME_LEN`] characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::OutOfRange {
            field: "name length".to_string(),
            min: 1,
            max: MAX_PRODUCT_NAME_LEN as i64,
        });
    }

    Ok(())
}

/// Validates a payment token: only its presence, never its shape.
pub fn validate_payment_token(token: &str) -> ValidationResult<()> {
    if token.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "payment token".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Cart Validator
// =============================================================================

/// Result of the pre-checkout cart gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartValidation {
    Valid,
    Invalid { reason: String },
}

impl CartValidation {
    fn invalid(reason: &str) -> Self {
        CartValidation::Invalid {
            reason: reason.to_string(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, CartValidation::Valid)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            CartValidation::Valid => None,
            CartValidation::Invalid { reason } => Some(reason),
        }
    }
}

/// Stateless precondition gate run immediately before payment.
///
/// ## Checks (first failure wins)
/// ```text
/// cart is None        → "cart is required"
/// cart has no items   → "cannot checkout an empty cart"
/// total <= 0          → "total must be greater than zero"
/// ```
/// The last rule also rejects carts whose discounts consume the whole subtotal.
#[derive(Debug, Clone, Copy, Default)]
pub struct CartValidator;

impl CartValidator {
    pub const CART_REQUIRED: &'static str = "cart is required";
    pub const EMPTY_CART: &'static str = "cannot checkout an empty cart";
    pub const NON_POSITIVE_TOTAL: &'static str = "total must be greater than zero";

    pub fn validate(cart: Option<&Cart>) -> CartValidation {
        let Some(cart) = cart else {
            return CartValidation::invalid(Self::CART_REQUIRED);
        };

        if cart.is_empty() {
            return CartValidation::invalid(Self::EMPTY_CART);
        }

        let total = cart.calculate_total();
        if !total.is_positive() {
            debug!(%total, "Cart rejected, non-positive total");
            return CartValidation::invalid(Self::NON_POSITIVE_TOTAL);
        }

        CartValidation::Valid
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
