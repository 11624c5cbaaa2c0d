use super::money::Money;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub const TRANSACTION_PREFIX: &str = "txn_";
pub const REFUND_PREFIX: &str = "refund_";

/// What the gateway reports for a charge it was able to evaluate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeResponse {
    pub success: bool,
    /// Present iff `success`.
    pub transaction_id: Option<String>,
    pub message: String,
}

impl ChargeResponse {
    pub fn approved(transaction_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            transaction_id: Some(transaction_id.into()),
            message: message.into(),
        }
    }

    pub fn declined(message: impl Into<String>) -> Self {
        Self {
            success: false,
            transaction_id: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Completed,
    Refunded,
    NotFound,
}

/// A transport-level fault raised by the gateway boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("{0}")]
    Transport(String),
    #[error("gateway timed out")]
    Timeout,
}

/// The external payment processor.
///
/// `Ok` carries the processor's verdict (approved or declined); `Err` means the
/// call itself faulted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(
        &self,
        patron_id: &str,
        amount: Money,
        description: &str,
    ) -> Result<ChargeResponse, GatewayError>;

    async fn refund(
        &self,
        transaction_id: &str,
        amount: Money,
    ) -> Result<RefundResponse, GatewayError>;

    async fn verify_status(&self, transaction_id: &str) -> Result<PaymentStatus, GatewayError>;
}

pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
