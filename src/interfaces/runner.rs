use super::csv::command_reader::{Command, CommandKind};
use super::csv::outcome_writer::{Outcome, OutcomeStatus};
use crate::application::lending::LendingEngine;
use crate::application::reporting::StatusReporter;
use crate::application::settlement::FeeSettlement;
use crate::domain::book::BookId;
use crate::domain::payment::PaymentGatewayBox;
use crate::error::LibraryError;
use chrono::Utc;
use rust_decimal::Decimal;

/// Executes desk commands against the engine and a payment gateway.
pub struct CommandRunner {
    engine: LendingEngine,
    gateway: PaymentGatewayBox,
}

impl CommandRunner {
    pub fn new(engine: LendingEngine, gateway: PaymentGatewayBox) -> Self {
        Self { engine, gateway }
    }

    pub async fn run(&self, command: Command) -> Outcome {
        let result = self.dispatch(&command).await;
        let (status, message) = match result {
            Ok(message) => (OutcomeStatus::Ok, message),
            Err(e) => (OutcomeStatus::Error, e),
        };
        Outcome {
            command: command.command,
            patron: command.patron,
            book: command.book,
            status,
            message,
        }
    }

    async fn dispatch(&self, command: &Command) -> Result<String, String> {
        let now = command.at.unwrap_or_else(Utc::now);
        let patron = command.patron.as_deref().unwrap_or_default();
        let settlement = FeeSettlement::new(&self.engine);

        match command.command {
            CommandKind::Borrow => {
                let book = require_book(command)?;
                render(self.engine.borrow_at(patron, book, now).await)
            }
            CommandKind::Return => {
                let book = require_book(command)?;
                render(self.engine.return_book_at(patron, book, now).await)
            }
            CommandKind::Count => {
                render(self.engine.borrow_count(patron).await)
            }
            CommandKind::Fee => {
                let book = require_book(command)?;
                let assessment = self
                    .engine
                    .assess_fee_at(patron, book, now)
                    .await
                    .map_err(|e| e.to_string())?;
                to_json(&assessment)
            }
            CommandKind::Pay => {
                let book = require_book(command)?;
                render(
                    settlement
                        .pay_late_fee_at(patron, book, self.gateway.as_ref(), now)
                        .await,
                )
            }
            CommandKind::Refund => {
                let transaction_id = command.reference.as_deref().unwrap_or_default();
                let amount = command.amount.unwrap_or(Decimal::ZERO);
                render(
                    settlement
                        .refund_late_fee(transaction_id, amount, self.gateway.as_ref())
                        .await,
                )
            }
            CommandKind::Report => {
                let report = StatusReporter::new(&self.engine)
                    .patron_status_at(patron, now)
                    .await
                    .map_err(|e| e.to_string())?;
                match report {
                    Some(report) => to_json(&report),
                    None => Ok("{}".to_string()),
                }
            }
            CommandKind::Search => {
                let reference = command.reference.as_deref().unwrap_or_default();
                let (kind, term) = reference.split_once(':').unwrap_or((reference, ""));
                let books = self
                    .engine
                    .search(term, kind)
                    .await
                    .map_err(|e| e.to_string())?;
                to_json(&books)
            }
        }
    }
}

/// An empty `book` column is a malformed row, not a lookup miss.
fn require_book(command: &Command) -> Result<BookId, String> {
    command
        .book
        .ok_or_else(|| "Malformed command: a book ID is required.".to_string())
}

fn render<T: ToString>(result: Result<T, LibraryError>) -> Result<String, String> {
    result.map(|ok| ok.to_string()).map_err(|e| e.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}
