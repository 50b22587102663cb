//! # Simulated Payment Gateway
//!
//! Stands in for a real payment service provider.
//!
//! ## Token Conventions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  token                  outcome                                         │
//! │  ─────────────────────  ──────────────────────────────────────────────  │
//! │  "" / whitespace        Failure("Invalid payment token")               │
//! │  amount <= 0            Failure("Invalid amount")                      │
//! │  "decline..."           Failure("Payment declined")                    │
//! │  "fault..."             Err(GatewayError) (simulated timeout)          │
//! │  anything else          Success("txn_<uuid>")                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use shopfront_core::{GatewayError, Money, PaymentGateway, PaymentResult};
use tracing::{debug, warn};
use uuid::Uuid;

const DECLINE_PREFIX: &str = "decline";
const FAULT_PREFIX: &str = "fault";

#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedGateway;

impl SimulatedGateway {
    pub fn new() -> Self {
        SimulatedGateway
    }

    fn declined(message: &str) -> Result<PaymentResult, GatewayError> {
        PaymentResult::failure(message).map_err(|e| GatewayError::new(e.to_string()))
    }
}

impl PaymentGateway for SimulatedGateway {
    fn charge(&self, amount: Money, token: &str) -> Result<PaymentResult, GatewayError> {
        let token = token.trim();
        if token.is_empty() {
            return Self::declined("Invalid payment token");
        }
        if !amount.is_positive() {
            return Self::declined("Invalid amount");
        }

        let lowered = token.to_ascii_lowercase();
        if lowered.starts_with(FAULT_PREFIX) {
            warn!(%amount, "Simulated gateway timeout");
            return Err(GatewayError::new("gateway timed out"));
        }
        if lowered.starts_with(DECLINE_PREFIX) {
            debug!(%amount, "Simulated decline");
            return Self::declined("Payment declined");
        }

        let transaction_id = format!("txn_{}", Uuid::new_v4().simple());
        debug!(%amount, %transaction_id, "Simulated charge approved");
        PaymentResult::success(transaction_id).map_err(|e| GatewayError::new(e.to_string()))
    }
}
