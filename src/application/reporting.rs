use super::lending::LendingEngine;
use crate::domain::book::BookId;
use crate::domain::fee;
use crate::domain::money::Money;
use crate::domain::patron::PatronId;
use crate::error::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BorrowedBookSummary {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub due_date: NaiveDate,
    pub is_overdue: bool,
    pub days_overdue: i64,
    pub late_fee: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatronStatusReport {
    pub patron_id: PatronId,
    pub currently_borrowed: Vec<BorrowedBookSummary>,
    pub num_currently_borrowed: usize,
    pub total_late_fees: Money,
}

pub struct StatusReporter<'a> {
    lending: &'a LendingEngine,
}

impl<'a> StatusReporter<'a> {
    pub fn new(lending: &'a LendingEngine) -> Self {
        Self { lending }
    }

    pub async fn patron_status(&self, patron: &str) -> Result<Option<PatronStatusReport>> {
        self.patron_status_at(patron, Utc::now()).await
    }

    /// Summarises the patron's outstanding loans and the fees accrued on them.
    ///
    /// Unlike the lending operations, a malformed patron id is not an error:
    /// it yields `Ok(None)`, the empty report.
    pub async fn patron_status_at(
        &self,
        patron: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PatronStatusReport>> {
        let Ok(patron) = PatronId::parse(patron) else {
            return Ok(None);
        };

        let schedule = &self.lending.policy().fees;
        let mut currently_borrowed = Vec::new();
        for record in self.lending.outstanding(&patron).await? {
            let book = self.lending.find_book(record.book_id).await?;
            let assessment = fee::assess(record.due_at, now, schedule);
            currently_borrowed.push(BorrowedBookSummary {
                book_id: book.id,
                title: book.title,
                author: book.author,
                due_date: record.due_at.date_naive(),
                is_overdue: record.is_overdue(now),
                days_overdue: assessment.days_overdue,
                late_fee: assessment.fee_amount,
            });
        }

        let total_late_fees = currently_borrowed.iter().map(|b| b.late_fee).sum();
        Ok(Some(PatronStatusReport {
            patron_id: patron,
            num_currently_borrowed: currently_borrowed.len(),
            currently_borrowed,
            total_late_fees,
        }))
    }
}
