use super::book::BookId;
use super::patron::PatronId;
use chrono::{DateTime, Duration, Utc};

/// One lending of one copy to one patron.
///
/// Records are never deleted; a return only stamps `returned_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowRecord {
    pub patron: PatronId,
    pub book_id: BookId,
    pub borrowed_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl BorrowRecord {
    pub fn new(
        patron: PatronId,
        book_id: BookId,
        borrowed_at: DateTime<Utc>,
        loan_period_days: i64,
    ) -> Self {
        Self {
            patron,
            book_id,
            borrowed_at,
            due_at: borrowed_at + Duration::days(loan_period_days),
            returned_at: None,
        }
    }

    pub fn is_outstanding(&self) -> bool {
        self.returned_at.is_none()
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_outstanding() && now > self.due_at
    }

    /// The instant fees stop accruing: the return time, or `now` while outstanding.
    pub fn assessed_until(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.returned_at.unwrap_or(now)
    }
}
