//! # Money Module
//!
//! Provides the `Money` type for handling monetary values exactly.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  THE INTEGER-CENTS PROBLEM                                              │
//! │    5% of $1999.98 = $99.999 → cents cannot hold it without rounding     │
//! │    and the charged total would drift from subtotal - discount          │
//! │                                                                         │
//! │  OUR SOLUTION: Base-10 Decimal (rust_decimal)                           │
//! │    1999.98 × 0.05 = 99.999 exactly                                      │
//! │    1999.98 - 99.999 = 1899.981 exactly                                  │
//! │    No rounding anywhere in the pricing pipeline                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shopfront_core::money::Money;
//!
//! let price = Money::parse("999.99").unwrap();
//! let total = price + Money::from_whole(1);
//! assert_eq!(total, Money::from_whole(1000));
//!
//! // Negative prices are rejected at the door
//! assert!(Money::parse("-1").is_err());
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

use crate::error::{ValidationError, ValidationResult};
use crate::types::{DiscountRate, Quantity};

// =============================================================================
// Money Type
// =============================================================================

/// An exact decimal monetary amount.
///
/// ## Design Decisions
/// - **Decimal (signed)**: constructors only accept `>= 0`, but subtraction
///   may go negative. A discount set that exceeds the subtotal surfaces as a
///   negative total instead of being clamped to zero.
/// - **Single field tuple struct**: zero-cost wrapper over `Decimal`
/// - **Serde**: serialized as a decimal string (`"1999.98"`), never a float.
///   Deserialization goes through [`Money::new`], so a negative amount is
///   rejected on the way in.
///
/// ## Where Money Flows
/// ```text
/// Product.price ──► LineItem.unit_price ──► LineItem.line_total
///                                               │
///                          Σ ◄──────────────────┘
///                          │
///                 Cart subtotal ──► DiscountEngine ──► discount
///                          │                              │
///                          └──────── subtotal - discount ─┘
///                                          │
///                                  Cart total ──► PaymentGateway.charge
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// Creates a Money value, rejecting negative amounts.
    pub fn new(amount: Decimal) -> ValidationResult<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ValidationError::negative("amount"));
        }
        Ok(Money(amount))
    }

    /// Parses a decimal string such as `"999.99"`.
    ///
    /// ## Example
    /// ```rust
    /// use shopfront_core::money::Money;
    ///
    /// let price = Money::parse("10.50").unwrap();
    /// assert_eq!(price.to_string(), "$10.50");
    /// assert!(Money::parse("ten").is_err());
    /// ```
    pub fn parse(value: &str) -> ValidationResult<Self> {
        let amount =
            Decimal::from_str(value.trim()).map_err(|e| ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: e.to_string(),
            })?;
        Money::new(amount)
    }

    /// Creates a Money value from a whole number of currency units.
    #[inline]
    pub fn from_whole(units: u64) -> Self {
        Money(Decimal::from(units))
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Returns the exact decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Multiplies money by a quantity. Exact, no rounding.
    ///
    /// Fails with `Overflow` when the product does not fit in a decimal.
    ///
    /// ## Example
    /// ```rust
    /// use shopfront_core::money::Money;
    /// use shopfront_core::types::Quantity;
    ///
    /// let unit_price = Money::parse("999.99").unwrap();
    /// let line_total = unit_price.multiply_quantity(Quantity::new(2).unwrap()).unwrap();
    /// assert_eq!(line_total, Money::parse("1999.98").unwrap());
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: Quantity) -> ValidationResult<Self> {
        self.0
            .checked_mul(Decimal::from(qty.get()))
            .map(Money)
            .ok_or_else(|| ValidationError::overflow("amount"))
    }

    /// Adds two amounts, failing with `Overflow` instead of panicking.
    #[inline]
    pub fn checked_add(self, other: Money) -> ValidationResult<Self> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(|| ValidationError::overflow("amount"))
    }

    /// Adds two amounts, capping at the largest representable amount.
    #[inline]
    pub fn saturating_add(self, other: Money) -> Self {
        Money(self.0.saturating_add(other.0))
    }

    /// Returns `rate` of this amount. Exact, no rounding.
    ///
    /// ## Example
    /// ```rust
    /// use shopfront_core::money::Money;
    /// use shopfront_core::types::DiscountRate;
    ///
    /// let subtotal = Money::parse("1999.98").unwrap();
    /// let discount = subtotal.portion(DiscountRate::from_bps(500)); // 5%
    /// assert_eq!(discount, Money::parse("99.999").unwrap());
    /// ```
    ///
    /// Rates above 100% saturate at the largest representable amount.
    pub fn portion(&self, rate: DiscountRate) -> Self {
        // bps × 10^-4 is an exact decimal fraction
        Money(self.0.saturating_mul(Decimal::new(i64::from(rate.bps()), 4)))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows at least two decimal places, more when the amount carries them.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = self.0.abs().normalize();
        if value.scale() < 2 {
            value.rescale(2);
        }
        let sign = if self.is_negative() { "-" } else { "" };
        write!(f, "{}${}", sign, value)
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = ValidationError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Money::new(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Panics on overflow, like `Decimal`. Use `checked_add` when the operands
/// are not already bounded by a validated total.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction may produce a negative amount.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
