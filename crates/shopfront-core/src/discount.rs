//! # Discount Engine
//!
//! Pluggable discount rules and the engine that aggregates them.
//!
//! ## Evaluation Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Discount Evaluation                                │
//! │                                                                         │
//! │  (items, subtotal)                                                     │
//! │        │                                                                │
//! │        ├──► Rule #1 "Bulk Discount"  ──► 60.00  ─┐                     │
//! │        │                                         ├──► Σ = 262.50       │
//! │        └──► Rule #2 "Order Discount" ──► 202.50 ─┘                     │
//! │                                                                         │
//! │  Rules are pure and purely additive: no precedence, no interaction.    │
//! │  Registration order only decides the order of applied_discounts().     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use tracing::{debug, warn};

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::{DiscountApplication, DiscountRate, LineItem};

// =============================================================================
// Discount Rule
// =============================================================================

/// A pure pricing rule: `(items, subtotal) → discount >= 0`.
///
/// Implementations must not have side effects; the engine may evaluate a
/// rule many times per checkout.
pub trait DiscountRule: Send + Sync {
    /// Stable, unique name used for reporting.
    fn name(&self) -> &str;

    /// Discount contributed by this rule.
    fn calculate(&self, items: &[LineItem], subtotal: Money) -> Money;
}

// =============================================================================
// Bulk Rule
// =============================================================================

/// Takes a percentage off every line whose quantity reaches a threshold.
///
/// Reference setting: 10 % off each line with 10 or more units. Lines below
/// the threshold contribute nothing, independently of the other lines.
#[derive(Debug, Clone)]
pub struct BulkDiscountRule {
    min_quantity: u32,
    rate: DiscountRate,
}

impl BulkDiscountRule {
    pub const NAME: &'static str = "Bulk Discount";
    pub const DEFAULT_MIN_QUANTITY: u32 = 10;
    pub const DEFAULT_RATE: DiscountRate = DiscountRate::from_bps(1000);

    pub fn new(min_quantity: u32, rate: DiscountRate) -> Self {
        BulkDiscountRule { min_quantity, rate }
    }

    pub fn min_quantity(&self) -> u32 {
        self.min_quantity
    }

    pub fn rate(&self) -> DiscountRate {
        self.rate
    }
}

impl Default for BulkDiscountRule {
    fn default() -> Self {
        BulkDiscountRule::new(Self::DEFAULT_MIN_QUANTITY, Self::DEFAULT_RATE)
    }
}

impl DiscountRule for BulkDiscountRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn calculate(&self, items: &[LineItem], _subtotal: Money) -> Money {
        items
            .iter()
            .filter(|item| item.quantity().get() >= self.min_quantity)
            .map(|item| item.line_total().portion(self.rate))
            .fold(Money::zero(), Money::saturating_add)
    }
}

// =============================================================================
// Order-Total Rule
// =============================================================================

/// Takes a percentage off the whole subtotal once it reaches a threshold.
///
/// Reference setting: 5 % off when the subtotal is at least 1000 (inclusive).
#[derive(Debug, Clone)]
pub struct OrderDiscountRule {
    min_subtotal: Money,
    rate: DiscountRate,
}

impl OrderDiscountRule {
    pub const NAME: &'static str = "Order Discount";
    pub const DEFAULT_MIN_SUBTOTAL: u64 = 1000;
    pub const DEFAULT_RATE: DiscountRate = DiscountRate::from_bps(500);

    pub fn new(min_subtotal: Money, rate: DiscountRate) -> Self {
        OrderDiscountRule { min_subtotal, rate }
    }

    pub fn min_subtotal(&self) -> Money {
        self.min_subtotal
    }

    pub fn rate(&self) -> DiscountRate {
        self.rate
    }
}

impl Default for OrderDiscountRule {
    fn default() -> Self {
        OrderDiscountRule::new(
            Money::from_whole(Self::DEFAULT_MIN_SUBTOTAL),
            Self::DEFAULT_RATE,
        )
    }
}

impl DiscountRule for OrderDiscountRule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn calculate(&self, _items: &[LineItem], subtotal: Money) -> Money {
        if subtotal >= self.min_subtotal {
            subtotal.portion(self.rate)
        } else {
            Money::zero()
        }
    }
}

// =============================================================================
// Discount Engine
// =============================================================================

/// Ordered registry of discount rules.
#[derive(Default)]
pub struct DiscountEngine {
    rules: Vec<Box<dyn DiscountRule>>,
}

impl DiscountEngine {
    /// Creates an engine with no rules (every query yields zero).
    pub fn new() -> Self {
        DiscountEngine { rules: Vec::new() }
    }

    /// Engine preloaded with the reference rules: bulk, then order-total.
    pub fn standard() -> Self {
        DiscountEngine {
            rules: vec![
                Box::new(BulkDiscountRule::default()),
                Box::new(OrderDiscountRule::default()),
            ],
        }
    }

    /// Registers a rule at the end of the evaluation order.
    ///
    /// Fails when the rule's name is blank or already registered.
    pub fn add_rule<R>(&mut self, rule: R) -> ValidationResult<()>
    where
        R: DiscountRule + 'static,
    {
        let name = rule.name().trim();
        if name.is_empty() {
            return Err(ValidationError::required("rule name"));
        }
        if self.rules.iter().any(|existing| existing.name().trim() == name) {
            return Err(ValidationError::Inconsistent {
                field: "rule name".to_string(),
                reason: format!("'{}' is already registered", name),
            });
        }
        debug!(rule = name, "Discount rule registered");
        self.rules.push(Box::new(rule));
        Ok(())
    }

    /// Names in registration order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Sum of every rule's contribution. An empty item list is valid.
    ///
    /// Saturates at the largest representable amount, which always exceeds
    /// the subtotal and so blocks checkout.
    pub fn calculate_discount(&self, items: &[LineItem], subtotal: Money) -> Money {
        self.evaluate(items, subtotal)
            .map(|(_, amount)| amount)
            .fold(Money::zero(), Money::saturating_add)
    }

    /// One entry per rule whose contribution is strictly positive, in
    /// registration order. Rules that return zero are left out.
    pub fn applied_discounts(&self, items: &[LineItem], subtotal: Money) -> Vec<DiscountApplication> {
        self.evaluate(items, subtotal)
            .filter(|(_, amount)| amount.is_positive())
            .filter_map(|(name, amount)| match DiscountApplication::new(name, amount) {
                Ok(application) => Some(application),
                Err(e) => {
                    warn!(rule = name, error = %e, "Dropping unreportable discount");
                    None
                }
            })
            .collect()
    }

    /// Evaluates every rule once. A negative contribution breaks the rule
    /// contract and counts as zero.
    fn evaluate<'a>(
        &'a self,
        items: &'a [LineItem],
        subtotal: Money,
    ) -> impl Iterator<Item = (&'a str, Money)> + 'a {
        self.rules.iter().map(move |rule| {
            let amount = rule.calculate(items, subtotal);
            if amount.is_negative() {
                warn!(rule = rule.name(), %amount, "Rule returned a negative discount, ignoring");
                return (rule.name(), Money::zero());
            }
            debug!(rule = rule.name(), %amount, "Discount rule evaluated");
            (rule.name(), amount)
        })
    }
}

impl fmt::Debug for DiscountEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscountEngine")
            .field("rules", &self.rule_names())
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
