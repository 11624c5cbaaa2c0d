use crate::domain::money::Money;
use crate::domain::patron::PatronId;
use crate::domain::payment::{
    ChargeResponse, GatewayError, PaymentGateway, PaymentStatus, REFUND_PREFIX, RefundResponse,
    TRANSACTION_PREFIX,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Largest single charge the gateway accepts.
const CHARGE_LIMIT: Decimal = dec!(1000.00);

/// Default payment gateway used when no real processor is wired in.
///
/// Approves any well-formed charge up to the single-charge limit and
/// remembers which transactions have been refunded.
#[derive(Default, Clone)]
pub struct SimulatedPaymentGateway {
    sequence: Arc<AtomicU64>,
    refunded: Arc<RwLock<HashSet<String>>>,
}

impl SimulatedPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[async_trait]
impl PaymentGateway for SimulatedPaymentGateway {
    async fn charge(
        &self,
        patron_id: &str,
        amount: Money,
        _description: &str,
    ) -> Result<ChargeResponse, GatewayError> {
        if !amount.is_positive() {
            return Ok(ChargeResponse::declined("Invalid amount: must be greater than 0"));
        }
        if amount.value() > CHARGE_LIMIT {
            return Ok(ChargeResponse::declined("Payment declined: amount exceeds limit"));
        }
        if PatronId::parse(patron_id).is_err() {
            return Ok(ChargeResponse::declined("Invalid patron ID format"));
        }

        let sequence = self.next_sequence();
        let transaction_id = format!("{TRANSACTION_PREFIX}{patron_id}_{sequence:03}");
        Ok(ChargeResponse::approved(
            transaction_id,
            format!("Payment of ${amount} processed successfully"),
        ))
    }

    async fn refund(
        &self,
        transaction_id: &str,
        amount: Money,
    ) -> Result<RefundResponse, GatewayError> {
        if !transaction_id.starts_with(TRANSACTION_PREFIX) {
            return Ok(RefundResponse {
                success: false,
                message: "Invalid transaction ID".to_string(),
            });
        }
        if !amount.is_positive() {
            return Ok(RefundResponse {
                success: false,
                message: "Invalid refund amount".to_string(),
            });
        }

        let refund_id = format!("{REFUND_PREFIX}{transaction_id}_{}", self.next_sequence());
        self.refunded.write().await.insert(transaction_id.to_string());
        Ok(RefundResponse {
            success: true,
            message: format!("Refund of ${amount} processed successfully. Refund ID: {refund_id}"),
        })
    }

    async fn verify_status(&self, transaction_id: &str) -> Result<PaymentStatus, GatewayError> {
        if !transaction_id.starts_with(TRANSACTION_PREFIX) {
            return Ok(PaymentStatus::NotFound);
        }
        if self.refunded.read().await.contains(transaction_id) {
            Ok(PaymentStatus::Refunded)
        } else {
            Ok(PaymentStatus::Completed)
        }
    }
}
