mod common;

use chrono::Duration;
use common::{GatewayCall, PATRON, RecordingGateway, Script, engine_with_catalog, start};
use library_lending::application::settlement::FeeSettlement;
use library_lending::domain::money::Money;
use library_lending::domain::payment::{PaymentGateway, PaymentStatus};
use library_lending::error::LibraryError;
use library_lending::infrastructure::gateway::SimulatedPaymentGateway;
use rust_decimal_macros::dec;

const POTTER: (&str, &str, &str, i64) = ("Harry Potter", "J. K. Rowling", "9780747532699", 1);

#[tokio::test]
async fn test_pay_overdue_fee() {
    let (engine, ids) = engine_with_catalog(&[POTTER]).await;
    engine.borrow_at(PATRON, ids[0], start()).await.unwrap();
    let now = start() + Duration::days(14 + 9);

    let gateway = RecordingGateway::new(Script::Approve);
    let receipt = FeeSettlement::new(&engine)
        .pay_late_fee_at(PATRON, ids[0], &gateway, now)
        .await
        .unwrap();

    assert_eq!(receipt.transaction_id, "txn_123456_001");
    assert!(receipt.to_string().starts_with("Payment successful!"));
    assert_eq!(
        gateway.calls(),
        vec![GatewayCall::Charge {
            patron_id: PATRON.to_string(),
            amount: Money::new(dec!(5.50)),
            description: "Late fees for 'Harry Potter'".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_returned_book_fee_can_still_be_paid() {
    let (engine, ids) = engine_with_catalog(&[POTTER]).await;
    engine.borrow_at(PATRON, ids[0], start()).await.unwrap();
    let returned = start() + Duration::days(14 + 30);
    engine.return_book_at(PATRON, ids[0], returned).await.unwrap();

    let gateway = RecordingGateway::new(Script::Approve);
    let receipt = FeeSettlement::new(&engine)
        .pay_late_fee_at(PATRON, ids[0], &gateway, returned + Duration::days(3))
        .await
        .unwrap();
    assert_eq!(receipt.amount, Money::new(dec!(15.00)));
}

#[tokio::test]
async fn test_no_fee_never_reaches_gateway() {
    let (engine, ids) = engine_with_catalog(&[POTTER]).await;
    engine.borrow_at(PATRON, ids[0], start()).await.unwrap();

    let gateway = RecordingGateway::new(Script::Approve);
    let result = FeeSettlement::new(&engine)
        .pay_late_fee_at(PATRON, ids[0], &gateway, start() + Duration::days(1))
        .await;

    assert_eq!(result, Err(LibraryError::NoFeeDue));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_declined_payment_has_no_transaction() {
    let (engine, ids) = engine_with_catalog(&[POTTER]).await;
    engine.borrow_at(PATRON, ids[0], start()).await.unwrap();

    let gateway = RecordingGateway::new(Script::Decline("Card expired"));
    let err = FeeSettlement::new(&engine)
        .pay_late_fee_at(PATRON, ids[0], &gateway, start() + Duration::days(20))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Payment failed: Card expired");
    assert_eq!(gateway.calls().len(), 1);
}

#[tokio::test]
async fn test_gateway_fault_does_not_escape() {
    let (engine, ids) = engine_with_catalog(&[POTTER]).await;
    engine.borrow_at(PATRON, ids[0], start()).await.unwrap();

    let gateway = RecordingGateway::new(Script::Fault("Network error"));
    let result = FeeSettlement::new(&engine)
        .pay_late_fee_at(PATRON, ids[0], &gateway, start() + Duration::days(20))
        .await;

    assert_eq!(
        result.unwrap_err().to_string(),
        "Payment processing error: Network error"
    );
}

#[tokio::test]
async fn test_refund_rejects_foreign_transaction_ids() {
    let (engine, _) = engine_with_catalog(&[POTTER]).await;
    let gateway = RecordingGateway::new(Script::Approve);

    let result = FeeSettlement::new(&engine)
        .refund_late_fee("pay_123456_001", dec!(5.00), &gateway)
        .await;

    assert_eq!(result, Err(LibraryError::InvalidTransactionId));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_refund_fault_is_wrapped() {
    let (engine, _) = engine_with_catalog(&[POTTER]).await;
    let gateway = RecordingGateway::new(Script::Fault("connection reset"));

    let err = FeeSettlement::new(&engine)
        .refund_late_fee("txn_123456_001", dec!(5.00), &gateway)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Refund processing error: connection reset");
}

#[tokio::test]
async fn test_pay_then_refund_with_simulated_gateway() {
    let (engine, ids) = engine_with_catalog(&[POTTER]).await;
    engine.borrow_at(PATRON, ids[0], start()).await.unwrap();
    let gateway = SimulatedPaymentGateway::new();
    let settlement = FeeSettlement::new(&engine);

    let payment = settlement
        .pay_late_fee_at(PATRON, ids[0], &gateway, start() + Duration::days(16))
        .await
        .unwrap();
    assert_eq!(payment.amount, Money::new(dec!(1.00)));
    assert!(payment.transaction_id.starts_with("txn_123456_"));

    let refund = settlement
        .refund_late_fee(&payment.transaction_id, payment.amount.value(), &gateway)
        .await
        .unwrap();
    assert!(refund.to_string().contains("Refund ID: refund_"));
    assert_eq!(
        gateway.verify_status(&payment.transaction_id).await.unwrap(),
        PaymentStatus::Refunded
    );
}
