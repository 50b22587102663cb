//! # Checkout Pipeline
//!
//! Turns a cart into a paid, persisted order, or into a typed failure.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Stages                                    │
//! │                                                                         │
//! │  TokenPending ──► TokenValidated ──► CartValidated ──► PaymentInFlight │
//! │       │                 │                                   │          │
//! │       ▼                 ▼                        ┌──────────┴───────┐  │
//! │    Failed            Failed                      ▼                  ▼  │
//! │  (blank token)   (validator reason)      PaymentSucceeded    PaymentFailed
//! │                                                  │                  │  │
//! │                                                  ▼                  ▼  │
//! │                                           OrderPersisted         Failed│
//! │                                                  │                     │
//! │                                                  ▼                     │
//! │                                              Completed                 │
//! │                                                                         │
//! │  The gateway is only reached after both gates pass.                    │
//! │  Totals are read once, before the charge, and never re-derived.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Outcomes
//! - `Ok(CheckoutResult::Success)`: charged, order built and saved
//! - `Ok(CheckoutResult::Failure)`: nothing was charged, no order exists
//! - `Err(CoreError::OrderRecord)` / `Err(CoreError::Persistence)`: charged
//!   but the order could not be built or saved. Both errors carry the order
//!   and transaction ids for compensation.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::order::{Order, OrderDraft, OrderLineItem, OrderStatus};
use crate::ports::{OrderStore, PaymentGateway};
use crate::types::{CheckoutResult, PaymentResult};
use crate::validation::{validate_payment_token, CartValidation, CartValidator};

/// Prefix of every generated order id.
pub const ORDER_ID_PREFIX: &str = "ORD-";

/// Hex characters following the prefix.
pub const ORDER_ID_SUFFIX_LEN: usize = 8;

// =============================================================================
// Stages
// =============================================================================

/// Position of a checkout in its state machine. Used for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    TokenPending,
    TokenValidated,
    CartValidated,
    PaymentInFlight,
    PaymentSucceeded,
    OrderPersisted,
    Completed,
    PaymentFailed,
    Failed,
}

impl CheckoutStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStage::TokenPending => "token_pending",
            CheckoutStage::TokenValidated => "token_validated",
            CheckoutStage::CartValidated => "cart_validated",
            CheckoutStage::PaymentInFlight => "payment_in_flight",
            CheckoutStage::PaymentSucceeded => "payment_succeeded",
            CheckoutStage::OrderPersisted => "order_persisted",
            CheckoutStage::Completed => "completed",
            CheckoutStage::PaymentFailed => "payment_failed",
            CheckoutStage::Failed => "failed",
        }
    }

    /// True for the two stages a checkout ends in.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckoutStage::Completed | CheckoutStage::Failed)
    }
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order Ids
// =============================================================================

/// Generates an order id of the form `ORD-XXXXXXXX` (uppercase hex).
///
/// Uniqueness is enforced by the order store's keying; 32 random bits make
/// collisions negligible for a single shop.
///
/// ## Example
/// ```rust
/// use shopfront_core::checkout::generate_order_id;
///
/// let id = generate_order_id();
/// assert!(id.starts_with("ORD-"));
/// assert_eq!(id.len(), 12);
/// ```
pub fn generate_order_id() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "{}{}",
        ORDER_ID_PREFIX,
        random[..ORDER_ID_SUFFIX_LEN].to_ascii_uppercase()
    )
}

// =============================================================================
// Checkout Service
// =============================================================================

/// Orchestrates validation, payment, order materialization and persistence.
///
/// Never retries. Retries belong to the gateway and store adapters.
pub struct CheckoutService {
    gateway: Arc<dyn PaymentGateway>,
    store: Option<Arc<dyn OrderStore>>,
}

impl CheckoutService {
    /// A pipeline without persistence: completed orders are not retrievable.
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        CheckoutService {
            gateway,
            store: None,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn OrderStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Runs one checkout of `cart` paid with `payment_token`.
    ///
    /// The cart is read, never modified. Clearing it afterwards is the
    /// caller's decision.
    pub fn checkout(&self, cart: &Cart, payment_token: &str) -> CoreResult<CheckoutResult> {
        let mut stage = CheckoutStage::TokenPending;

        // Gate 1: token presence, before the cart is even looked at
        if let Err(e) = validate_payment_token(payment_token) {
            return self.fail(&mut stage, e.to_string(), None);
        }
        advance(&mut stage, CheckoutStage::TokenValidated);

        // Gate 2: business state of the cart
        if let CartValidation::Invalid { reason } = CartValidator::validate(Some(cart)) {
            return self.fail(&mut stage, reason, None);
        }
        advance(&mut stage, CheckoutStage::CartValidated);

        // Single consistent read of everything the order will record
        let totals = cart.totals();
        let line_items: Vec<OrderLineItem> = cart
            .items()
            .iter()
            .map(OrderLineItem::from_line_item)
            .collect();

        advance(&mut stage, CheckoutStage::PaymentInFlight);
        info!(total = %totals.total, lines = line_items.len(), "Charging payment gateway");

        let payment = match self.gateway.charge(totals.total, payment_token) {
            Ok(payment) => payment,
            Err(fault) => {
                warn!(error = %fault, "Payment gateway fault");
                PaymentResult::Failure {
                    error_message: format!("payment processing error: {}", fault),
                }
            }
        };

        let transaction_id = match &payment {
            PaymentResult::Success { transaction_id } if !transaction_id.trim().is_empty() => {
                transaction_id.clone()
            }
            PaymentResult::Success { .. } => {
                error!("Gateway reported success without a transaction id");
                advance(&mut stage, CheckoutStage::PaymentFailed);
                let payment = PaymentResult::Failure {
                    error_message: "gateway returned no transaction id".to_string(),
                };
                return self.fail(
                    &mut stage,
                    "payment failed: gateway returned no transaction id".to_string(),
                    Some(payment),
                );
            }
            PaymentResult::Failure { error_message } => {
                advance(&mut stage, CheckoutStage::PaymentFailed);
                let message = format!("payment failed: {}", error_message);
                return self.fail(&mut stage, message, Some(payment));
            }
        };
        advance(&mut stage, CheckoutStage::PaymentSucceeded);

        let order_id = generate_order_id();
        let draft = OrderDraft {
            order_id: order_id.clone(),
            line_items,
            subtotal: totals.subtotal,
            discount_amount: totals.discount,
            total: totals.total,
            transaction_id: transaction_id.clone(),
            status: OrderStatus::Completed,
        };
        let order = match Order::new(draft) {
            Ok(order) => order,
            Err(source) => {
                error!(%order_id, %transaction_id, error = %source, "Charged order failed validation");
                return Err(CoreError::OrderRecord {
                    order_id,
                    transaction_id,
                    source,
                });
            }
        };

        match &self.store {
            Some(store) => {
                if let Err(source) = store.save(order) {
                    error!(
                        %order_id,
                        %transaction_id,
                        error = %source,
                        "Payment captured but order could not be saved"
                    );
                    return Err(CoreError::Persistence {
                        order_id,
                        transaction_id,
                        source,
                    });
                }
                advance(&mut stage, CheckoutStage::OrderPersisted);
            }
            None => debug!(%order_id, "No order store configured, order not persisted"),
        }

        advance(&mut stage, CheckoutStage::Completed);
        info!(%order_id, %transaction_id, total = %totals.total, "Checkout completed");

        Ok(CheckoutResult::success(order_id, payment)?)
    }

    fn fail(
        &self,
        stage: &mut CheckoutStage,
        message: String,
        payment: Option<PaymentResult>,
    ) -> CoreResult<CheckoutResult> {
        warn!(from = %stage, reason = %message, "Checkout rejected");
        *stage = CheckoutStage::Failed;
        Ok(CheckoutResult::failure(message, payment)?)
    }
}

fn advance(stage: &mut CheckoutStage, next: CheckoutStage) {
    debug!(from = %stage, to = %next, "Checkout stage");
    *stage = next;
}

impl fmt::Debug for CheckoutService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutService")
            .field("store", &self.store.is_some())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
