//! # Domain Types
//!
//! Core value types and records used throughout Shopfront.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    LineItem     │   │ DiscountApplic. │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  sku            │──►│  sku (frozen)   │   │  rule_name      │       │
//! │  │  name           │   │  name (frozen)  │   │  amount         │       │
//! │  │  price          │   │  unit_price     │   └─────────────────┘       │
//! │  └─────────────────┘   │  quantity       │                             │
//! │                        └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Quantity     │   │  DiscountRate   │   │ PaymentResult / │       │
//! │  │  > 0 always     │   │  bps (u32)      │   │ CheckoutResult  │       │
//! │  │                 │   │  1000 = 10%     │   │ Success|Failure │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every record is built through a validating constructor, so an invalid
//! Product, LineItem or result value cannot exist. Deserialization runs the
//! same constructors (`#[serde(try_from = ...)]`).

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::validation::{validate_product_name, validate_sku};

// =============================================================================
// Quantity
// =============================================================================

/// A strictly positive item count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// Creates a quantity, rejecting `<= 0` and values that do not fit in `u32`.
    ///
    /// ## Example
    /// ```rust
    /// use shopfront_core::types::Quantity;
    ///
    /// assert_eq!(Quantity::new(12).unwrap().get(), 12);
    /// assert!(Quantity::new(0).is_err());
    /// assert!(Quantity::new(-3).is_err());
    /// ```
    pub fn new(value: i64) -> ValidationResult<Self> {
        if value <= 0 {
            return Err(ValidationError::must_be_positive("quantity"));
        }
        let value = u32::try_from(value).map_err(|_| ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(u32::MAX),
        })?;
        Ok(Quantity(value))
    }

    #[inline]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Adds two quantities, failing on overflow.
    pub fn checked_add(self, other: Quantity) -> ValidationResult<Quantity> {
        self.0
            .checked_add(other.0)
            .map(Quantity)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 1,
                max: i64::from(u32::MAX),
            })
    }
}

impl TryFrom<i64> for Quantity {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Quantity::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

// =============================================================================
// Discount Rate
// =============================================================================

/// Discount rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10%, 500 bps = 5%
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog snapshot of a purchasable product. Immutable once looked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord")]
pub struct Product {
    sku: String,
    name: String,
    price: Money,
}

impl Product {
    /// Creates a product, validating sku, name and price.
    ///
    /// ## Example
    /// ```rust
    /// use shopfront_core::{Money, Product};
    ///
    /// let laptop = Product::new("LAPTOP-001", "Gaming Laptop", Money::from_whole(1500)).unwrap();
    /// assert_eq!(laptop.sku(), "LAPTOP-001");
    /// assert!(Product::new("", "Nameless", Money::zero()).is_err());
    /// ```
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        price: Money,
    ) -> ValidationResult<Self> {
        let sku = sku.into();
        let name = name.into();
        validate_sku(&sku)?;
        validate_product_name(&name)?;
        if price.is_negative() {
            return Err(ValidationError::negative("price"));
        }
        Ok(Product { sku, name, price })
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Money {
        self.price
    }
}

/// Wire shape of [`Product`], validated on the way in.
#[derive(Deserialize)]
struct ProductRecord {
    sku: String,
    name: String,
    price: Money,
}

impl TryFrom<ProductRecord> for Product {
    type Error = ValidationError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        Product::new(record.sku, record.name, record.price)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One SKU's accumulated quantity within a cart.
///
/// ## Price Freezing
/// `unit_price` is captured from the product snapshot when the item is first
/// added. Later catalog price changes do not reach an existing line.
///
/// `line_total` is computed (checked) whenever the quantity changes, so a
/// line whose total does not fit in a decimal cannot exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LineItemRecord")]
pub struct LineItem {
    sku: String,
    name: String,
    unit_price: Money,
    quantity: Quantity,
    line_total: Money,
}

impl LineItem {
    /// Creates a line item from a product snapshot.
    ///
    /// Fails with `Overflow` when `price × quantity` is not representable.
    pub fn from_product(product: &Product, quantity: Quantity) -> ValidationResult<Self> {
        Ok(LineItem {
            sku: product.sku().to_string(),
            name: product.name().to_string(),
            unit_price: product.price(),
            quantity,
            line_total: product.price().multiply_quantity(quantity)?,
        })
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// `unit_price × quantity`, exact.
    pub fn line_total(&self) -> Money {
        self.line_total
    }

    /// Increments the quantity. Quantity only ever grows on a line.
    ///
    /// On error the line is unchanged.
    pub fn add_quantity(&mut self, quantity: Quantity) -> ValidationResult<()> {
        let quantity = self.quantity.checked_add(quantity)?;
        let line_total = self.unit_price.multiply_quantity(quantity)?;
        self.quantity = quantity;
        self.line_total = line_total;
        Ok(())
    }
}

/// Wire shape of [`LineItem`]. A serialized `line_total` is ignored and
/// recomputed.
#[derive(Deserialize)]
struct LineItemRecord {
    sku: String,
    name: String,
    unit_price: Money,
    quantity: Quantity,
}

impl TryFrom<LineItemRecord> for LineItem {
    type Error = ValidationError;

    fn try_from(record: LineItemRecord) -> Result<Self, Self::Error> {
        let product = Product::new(record.sku, record.name, record.unit_price)?;
        LineItem::from_product(&product, record.quantity)
    }
}

// =============================================================================
// Discount Application
// =============================================================================

/// A named, itemized discount attributed to one rule.
///
/// Produced fresh on every discount query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DiscountApplicationRecord")]
pub struct DiscountApplication {
    rule_name: String,
    amount: Money,
}

impl DiscountApplication {
    pub fn new(rule_name: impl Into<String>, amount: Money) -> ValidationResult<Self> {
        let rule_name = rule_name.into();
        if rule_name.trim().is_empty() {
            return Err(ValidationError::required("rule name"));
        }
        if amount.is_negative() {
            return Err(ValidationError::negative("discount amount"));
        }
        Ok(DiscountApplication { rule_name, amount })
    }

    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    pub fn amount(&self) -> Money {
        self.amount
    }
}

#[derive(Deserialize)]
struct DiscountApplicationRecord {
    rule_name: String,
    amount: Money,
}

impl TryFrom<DiscountApplicationRecord> for DiscountApplication {
    type Error = ValidationError;

    fn try_from(record: DiscountApplicationRecord) -> Result<Self, Self::Error> {
        DiscountApplication::new(record.rule_name, record.amount)
    }
}

// =============================================================================
// Payment Result
// =============================================================================

/// Outcome of a charge attempt at the payment gateway.
///
/// A failure never carries a transaction id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PaymentResult {
    Success { transaction_id: String },
    Failure { error_message: String },
}

impl PaymentResult {
    /// A captured payment. The transaction id must not be blank.
    pub fn success(transaction_id: impl Into<String>) -> ValidationResult<Self> {
        let transaction_id = transaction_id.into();
        if transaction_id.trim().is_empty() {
            return Err(ValidationError::required("transaction id"));
        }
        Ok(PaymentResult::Success { transaction_id })
    }

    /// A declined or failed payment. The message must not be blank.
    pub fn failure(error_message: impl Into<String>) -> ValidationResult<Self> {
        let error_message = error_message.into();
        if error_message.trim().is_empty() {
            return Err(ValidationError::required("error message"));
        }
        Ok(PaymentResult::Failure { error_message })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PaymentResult::Success { .. })
    }

    pub fn transaction_id(&self) -> Option<&str> {
        match self {
            PaymentResult::Success { transaction_id } => Some(transaction_id),
            PaymentResult::Failure { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            PaymentResult::Success { .. } => None,
            PaymentResult::Failure { error_message } => Some(error_message),
        }
    }
}

// =============================================================================
// Checkout Result
// =============================================================================

/// Outcome of one checkout attempt. Never both arms, never neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckoutResult {
    Success {
        order_id: String,
        payment: PaymentResult,
    },
    Failure {
        error_message: String,
        payment: Option<PaymentResult>,
    },
}

impl CheckoutResult {
    pub fn success(order_id: impl Into<String>, payment: PaymentResult) -> ValidationResult<Self> {
        let order_id = order_id.into();
        if order_id.trim().is_empty() {
            return Err(ValidationError::required("order id"));
        }
        Ok(CheckoutResult::Success { order_id, payment })
    }

    pub fn failure(
        error_message: impl Into<String>,
        payment: Option<PaymentResult>,
    ) -> ValidationResult<Self> {
        let error_message = error_message.into();
        if error_message.trim().is_empty() {
            return Err(ValidationError::required("error message"));
        }
        Ok(CheckoutResult::Failure {
            error_message,
            payment,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CheckoutResult::Success { .. })
    }

    pub fn order_id(&self) -> Option<&str> {
        match self {
            CheckoutResult::Success { order_id, .. } => Some(order_id),
            CheckoutResult::Failure { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            CheckoutResult::Success { .. } => None,
            CheckoutResult::Failure { error_message, .. } => Some(error_message),
        }
    }

    pub fn payment(&self) -> Option<&PaymentResult> {
        match self {
            CheckoutResult::Success { payment, .. } => Some(payment),
            CheckoutResult::Failure { payment, .. } => payment.as_ref(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
