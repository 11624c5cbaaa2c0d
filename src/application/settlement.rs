use super::lending::LendingEngine;
use crate::domain::book::BookId;
use crate::domain::money::Money;
use crate::domain::patron::PatronId;
use crate::domain::payment::{ChargeResponse, PaymentGateway, TRANSACTION_PREFIX};
use crate::error::{GatewayAction, LibraryError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub transaction_id: String,
    pub amount: Money,
    pub gateway_message: String,
}

impl fmt::Display for PaymentReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payment successful! {}", self.gateway_message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundReceipt {
    pub transaction_id: String,
    pub amount: Money,
    pub gateway_message: String,
}

impl fmt::Display for RefundReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.gateway_message)
    }
}

/// Collects and refunds late fees through an external payment gateway.
///
/// The gateway is passed per call. Whatever it does, declines and faults
/// come back as `LibraryError` values; nothing it raises reaches the caller.
pub struct FeeSettlement<'a> {
    lending: &'a LendingEngine,
}

impl<'a> FeeSettlement<'a> {
    pub fn new(lending: &'a LendingEngine) -> Self {
        Self { lending }
    }

    pub async fn pay_late_fee(
        &self,
        patron: &str,
        book_id: BookId,
        gateway: &dyn PaymentGateway,
    ) -> Result<PaymentReceipt> {
        self.pay_late_fee_at(patron, book_id, gateway, Utc::now()).await
    }

    /// Charges the patron the late fee owed on a book as of `now`.
    ///
    /// No gateway call is made unless a positive fee is due.
    ///
    /// # Arguments
    ///
    /// * `patron` - The 6-digit patron id.
    /// * `book_id` - The book whose loan carries the fee.
    /// * `gateway` - The gateway to charge through.
    /// * `now` - The instant outstanding loans are assessed at.
    pub async fn pay_late_fee_at(
        &self,
        patron: &str,
        book_id: BookId,
        gateway: &dyn PaymentGateway,
        now: DateTime<Utc>,
    ) -> Result<PaymentReceipt> {
        let patron = PatronId::parse(patron)?;

        let assessment = match self.lending.assess_fee_at(patron.as_str(), book_id, now).await {
            Ok(assessment) => assessment,
            Err(LibraryError::StorageError(_)) | Err(LibraryError::FeeUnavailable) => {
                return Err(LibraryError::FeeUnavailable);
            }
            Err(e) => return Err(e),
        };
        let amount = assessment.fee_amount;
        if !amount.is_positive() {
            return Err(LibraryError::NoFeeDue);
        }

        let book = self.lending.find_book(book_id).await?;
        let description = format!("Late fees for '{}'", book.title);

        match gateway.charge(patron.as_str(), amount, &description).await {
            Ok(ChargeResponse {
                success: true,
                transaction_id: Some(transaction_id),
                message,
            }) => {
                info!(%patron, book_id, %amount, %transaction_id, "late fee paid");
                Ok(PaymentReceipt {
                    transaction_id,
                    amount,
                    gateway_message: message,
                })
            }
            Ok(ChargeResponse { success: true, .. }) => {
                warn!(%patron, book_id, "payment gateway approved without a transaction id");
                Err(LibraryError::GatewayFault {
                    action: GatewayAction::Payment,
                    message: "approval carried no transaction ID".to_string(),
                })
            }
            Ok(response) => {
                warn!(%patron, book_id, message = %response.message, "late fee payment declined");
                Err(LibraryError::GatewayFailure {
                    action: GatewayAction::Payment,
                    message: response.message,
                })
            }
            Err(e) => {
                warn!(%patron, book_id, error = %e, "payment gateway fault");
                Err(LibraryError::GatewayFault {
                    action: GatewayAction::Payment,
                    message: e.to_string(),
                })
            }
        }
    }

    /// Refunds part or all of an earlier late-fee charge.
    ///
    /// The amount is checked against the fee cap before it is rounded to
    /// cents, so nothing above the cap can round its way under it.
    ///
    /// # Arguments
    ///
    /// * `transaction_id` - The `txn_` id of the original charge.
    /// * `amount` - The amount to refund, at most the per-book fee cap.
    /// * `gateway` - The gateway that took the original charge.
    pub async fn refund_late_fee(
        &self,
        transaction_id: &str,
        amount: Decimal,
        gateway: &dyn PaymentGateway,
    ) -> Result<RefundReceipt> {
        if transaction_id.is_empty() || !transaction_id.starts_with(TRANSACTION_PREFIX) {
            return Err(LibraryError::InvalidTransactionId);
        }
        if amount <= Decimal::ZERO {
            return Err(LibraryError::InvalidAmount);
        }
        if amount > self.lending.policy().fees.cap.value() {
            return Err(LibraryError::AmountExceedsCap);
        }
        let amount = Money::new(amount);
        if !amount.is_positive() {
            return Err(LibraryError::InvalidAmount);
        }

        match gateway.refund(transaction_id, amount).await {
            Ok(response) if response.success => {
                info!(%transaction_id, %amount, "late fee refunded");
                Ok(RefundReceipt {
                    transaction_id: transaction_id.to_string(),
                    amount,
                    gateway_message: response.message,
                })
            }
            Ok(response) => {
                warn!(%transaction_id, message = %response.message, "refund declined");
                Err(LibraryError::GatewayFailure {
                    action: GatewayAction::Refund,
                    message: response.message,
                })
            }
            Err(e) => {
                warn!(%transaction_id, error = %e, "payment gateway fault during refund");
                Err(LibraryError::GatewayFault {
                    action: GatewayAction::Refund,
                    message: e.to_string(),
                })
            }
        }
    }
}
