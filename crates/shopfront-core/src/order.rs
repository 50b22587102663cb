//! # Order
//!
//! Immutable record of a completed checkout.
//!
//! ## Construction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Order Construction                                 │
//! │                                                                         │
//! │  Cart line items ──► OrderLineItem::from_line_item (snapshot)          │
//! │                              │                                          │
//! │  captured totals ────────────┤                                          │
//! │  transaction id ─────────────┤                                          │
//! │                              ▼                                          │
//! │                        OrderDraft ──► Order::new ──► Order              │
//! │                                          │                              │
//! │                    rejects: blank ids, no lines,                        │
//! │                    negative amounts, subtotal != Σ lines,               │
//! │                    total != subtotal - discount                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Orders are never edited. Corrections are new records. A stored order is
//! read back through the same checks (`#[serde(try_from = ...)]`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::{LineItem, Quantity};
use crate::validation::{validate_product_name, validate_sku};

/// Lifecycle status of an order. Checkout only ever produces `Completed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Completed,
    Refunded,
    Cancelled,
}

// =============================================================================
// Order Line Item
// =============================================================================

/// Snapshot of one cart line at the moment of checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OrderLineItemRecord")]
pub struct OrderLineItem {
    sku: String,
    product_name: String,
    unit_price: Money,
    quantity: Quantity,
    line_total: Money,
}

impl OrderLineItem {
    pub fn new(
        sku: impl Into<String>,
        product_name: impl Into<String>,
        unit_price: Money,
        quantity: Quantity,
    ) -> ValidationResult<Self> {
        let sku = sku.into();
        let product_name = product_name.into();
        validate_sku(&sku)?;
        validate_product_name(&product_name)?;
        if unit_price.is_negative() {
            return Err(ValidationError::negative("unit price"));
        }

        Ok(OrderLineItem {
            line_total: unit_price.multiply_quantity(quantity)?,
            sku,
            product_name,
            unit_price,
            quantity,
        })
    }

    /// Snapshots a cart line. A `LineItem` already satisfies every rule.
    pub fn from_line_item(item: &LineItem) -> Self {
        OrderLineItem {
            sku: item.sku().to_string(),
            product_name: item.name().to_string(),
            unit_price: item.unit_price(),
            quantity: item.quantity(),
            line_total: item.line_total(),
        }
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn line_total(&self) -> Money {
        self.line_total
    }
}

#[derive(Deserialize)]
struct OrderLineItemRecord {
    sku: String,
    product_name: String,
    unit_price: Money,
    quantity: Quantity,
    line_total: Money,
}

impl TryFrom<OrderLineItemRecord> for OrderLineItem {
    type Error = ValidationError;

    fn try_from(record: OrderLineItemRecord) -> Result<Self, Self::Error> {
        let line = OrderLineItem::new(
            record.sku,
            record.product_name,
            record.unit_price,
            record.quantity,
        )?;
        if line.line_total != record.line_total {
            return Err(ValidationError::Inconsistent {
                field: "line total".to_string(),
                reason: format!(
                    "{} is not {} x {}",
                    record.line_total,
                    line.unit_price,
                    line.quantity.get()
                ),
            });
        }
        Ok(line)
    }
}

// =============================================================================
// Order
// =============================================================================

/// Everything an order needs except its creation timestamp.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub order_id: String,
    pub line_items: Vec<OrderLineItem>,
    pub subtotal: Money,
    pub discount_amount: Money,
    pub total: Money,
    pub transaction_id: String,
    pub status: OrderStatus,
}

/// A completed transaction.
///
/// ## Invariants
/// - `order_id` and `transaction_id` are non-blank
/// - At least one line item
/// - `subtotal`, `discount_amount`, `total` are all `>= 0`
/// - `subtotal == Σ line_total` and `total == subtotal - discount_amount`, exactly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OrderRecord")]
pub struct Order {
    order_id: String,
    line_items: Vec<OrderLineItem>,
    subtotal: Money,
    discount_amount: Money,
    total: Money,
    transaction_id: String,
    created_at: DateTime<Utc>,
    status: OrderStatus,
}

impl Order {
    /// Validates `draft` and stamps it with the current time.
    pub fn new(draft: OrderDraft) -> ValidationResult<Self> {
        Order::new_at(draft, Utc::now())
    }

    /// Validates `draft` with an explicit creation time.
    pub fn new_at(draft: OrderDraft, created_at: DateTime<Utc>) -> ValidationResult<Self> {
        let OrderDraft {
            order_id,
            line_items,
            subtotal,
            discount_amount,
            total,
            transaction_id,
            status,
        } = draft;

        if order_id.trim().is_empty() {
            return Err(ValidationError::required("order id"));
        }
        if transaction_id.trim().is_empty() {
            return Err(ValidationError::required("transaction id"));
        }
        if line_items.is_empty() {
            return Err(ValidationError::required("line items"));
        }
        for (field, amount) in [
            ("subtotal", subtotal),
            ("discount amount", discount_amount),
            ("total", total),
        ] {
            if amount.is_negative() {
                return Err(ValidationError::negative(field));
            }
        }

        let lines_total = line_items
            .iter()
            .try_fold(Money::zero(), |acc, line| acc.checked_add(line.line_total()))
            .map_err(|_| ValidationError::overflow("subtotal"))?;
        if subtotal != lines_total {
            return Err(ValidationError::Inconsistent {
                field: "subtotal".to_string(),
                reason: format!("{} does not match line items sum {}", subtotal, lines_total),
            });
        }
        if total != subtotal - discount_amount {
            return Err(ValidationError::Inconsistent {
                field: "total".to_string(),
                reason: format!(
                    "{} is not subtotal {} minus discount {}",
                    total, subtotal, discount_amount
                ),
            });
        }

        Ok(Order {
            order_id,
            line_items,
            subtotal,
            discount_amount,
            total,
            transaction_id,
            created_at,
            status,
        })
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn line_items(&self) -> &[OrderLineItem] {
        &self.line_items
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn discount_amount(&self) -> Money {
        self.discount_amount
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }
}

#[derive(Deserialize)]
struct OrderRecord {
    order_id: String,
    line_items: Vec<OrderLineItem>,
    subtotal: Money,
    discount_amount: Money,
    total: Money,
    transaction_id: String,
    created_at: DateTime<Utc>,
    status: OrderStatus,
}

impl TryFrom<OrderRecord> for Order {
    type Error = ValidationError;

    fn try_from(record: OrderRecord) -> Result<Self, Self::Error> {
        let draft = OrderDraft {
            order_id: record.order_id,
            line_items: record.line_items,
            subtotal: record.subtotal,
            discount_amount: record.discount_amount,
            total: record.total,
            transaction_id: record.transaction_id,
            status: record.status,
        };
        Order::new_at(draft, record.created_at)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::parse(s).unwrap()
    }

    fn line(sku: &str, price: &str, qty: i64) -> OrderLineItem {
        OrderLineItem::new(sku, "Widget", money(price), Quantity::new(qty).unwrap()).unwrap()
    }

    fn draft() -> OrderDraft {
        OrderDraft {
            order_id: "ORD-1A2B3C4D".to_string(),
            line_items: vec![line("SKU001", "999.99", 2)],
            subtotal: money("1999.98"),
            discount_amount: money("99.999"),
            total: money("1899.981"),
            transaction_id: "txn_42".to_string(),
            status: OrderStatus::Completed,
        }
    }

    #[test]
    fn test_valid_order() {
        let order = Order::new(draft()).unwrap();
        assert_eq!(order.order_id(), "ORD-1A2B3C4D");
        assert_eq!(order.line_items().len(), 1);
        assert_eq!(order.line_items()[0].line_total(), money("1999.98"));
        assert_eq!(order.total(), order.subtotal() - order.discount_amount());
        assert_eq!(order.status(), OrderStatus::Completed);
    }

    #[test]
    fn test_rejects_blank_ids() {
        let mut d = draft();
        d.order_id = " ".to_string();
        assert_eq!(Order::new(d).unwrap_err(), ValidationError::required("order id"));

        let mut d = draft();
        d.transaction_id = String::new();
        assert_eq!(Order::new(d).unwrap_err(), ValidationError::required("transaction id"));
    }

    #[test]
    fn test_rejects_empty_lines() {
        let mut d = draft();
        d.line_items.clear();
        d.subtotal = Money::zero();
        d.discount_amount = Money::zero();
        d.total = Money::zero();
        assert!(Order::new(d).is_err());
    }

    #[test]
    fn test_rejects_inconsistent_totals() {
        let mut d = draft();
        d.total = money("1900");
        assert!(matches!(
            Order::new(d),
            Err(ValidationError::Inconsistent { ref field, .. }) if field == "total"
        ));

        let mut d = draft();
        d.subtotal = money("2000");
        d.total = money("1900.001");
        assert!(matches!(
            Order::new(d),
            Err(ValidationError::Inconsistent { ref field, .. }) if field == "subtotal"
        ));
    }

    #[test]
    fn test_rejects_discount_above_subtotal() {
        let mut d = draft();
        d.discount_amount = money("2000");
        d.total = d.subtotal - d.discount_amount;
        assert_eq!(Order::new(d).unwrap_err(), ValidationError::negative("total"));
    }

    #[test]
    fn test_line_item_validation() {
        let qty = Quantity::new(1).unwrap();
        assert!(OrderLineItem::new("", "Widget", money("1"), qty).is_err());
        assert!(OrderLineItem::new("SKU001", " ", money("1"), qty).is_err());
        let negative = Money::zero() - money("1");
        assert!(OrderLineItem::new("SKU001", "Widget", negative, qty).is_err());
    }

    #[test]
    fn test_new_at_keeps_timestamp() {
        let at = DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let order = Order::new_at(draft(), at).unwrap();
        assert_eq!(order.created_at(), at);
    }

    #[test]
    fn test_order_json_shape() {
        let order = Order::new(draft()).unwrap();
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["total"], "1899.981");
        let back: Order = serde_json::from_value(json).unwrap();
        assert_eq!(back, order);
    }

    #[test]
    fn test_deserialize_rejects_tampered_orders() {
        let valid = serde_json::to_value(Order::new(draft()).unwrap()).unwrap();

        let mut zero_quantity = valid.clone();
        zero_quantity["line_items"][0]["quantity"] = 0.into();
        assert!(serde_json::from_value::<Order>(zero_quantity).is_err());

        let mut wrong_line_total = valid.clone();
        wrong_line_total["line_items"][0]["line_total"] = "999".into();
        assert!(serde_json::from_value::<Order>(wrong_line_total).is_err());

        let mut wrong_total = valid.clone();
        wrong_total["total"] = "100".into();
        let err = serde_json::from_value::<Order>(wrong_total).unwrap_err();
        assert!(err.to_string().contains("total is inconsistent"));

        let mut blank_transaction = valid;
        blank_transaction["transaction_id"] = "".into();
        let err = serde_json::from_value::<Order>(blank_transaction).unwrap_err();
        assert!(err.to_string().contains("transaction id is required"));
    }

    #[test]
    fn test_line_item_overflow_is_rejected() {
        let huge = money("79228162514264337593543950335");
        let err = OrderLineItem::new("BIG", "Huge", huge, Quantity::new(2).unwrap()).unwrap_err();
        assert_eq!(err, ValidationError::overflow("amount"));
    }
}
