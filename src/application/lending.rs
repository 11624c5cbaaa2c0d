use crate::config::LendingPolicy;
use crate::domain::book::{Book, BookId, BookQuery, NewBook};
use crate::domain::fee::{self, FeeAssessment};
use crate::domain::loan::BorrowRecord;
use crate::domain::patron::PatronId;
use crate::domain::ports::{CatalogStoreBox, LoanStoreBox};
use crate::error::{LibraryError, Result};
use chrono::{DateTime, Utc};
use std::fmt;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Confirmation of a successful borrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowReceipt {
    pub book_id: BookId,
    pub title: String,
    pub due_at: DateTime<Utc>,
}

impl fmt::Display for BorrowReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Successfully borrowed \"{}\". Due date: {}.",
            self.title,
            self.due_at.format("%Y-%m-%d")
        )
    }
}

/// Confirmation of a successful return, with the fee owed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnReceipt {
    pub book_id: BookId,
    pub returned_at: DateTime<Utc>,
    pub assessment: FeeAssessment,
}

impl fmt::Display for ReturnReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.assessment.fee_amount.is_positive() {
            write!(
                f,
                "Late by {} days. Fee owed: ${}.",
                self.assessment.days_overdue, self.assessment.fee_amount
            )
        } else {
            f.write_str("Book returned successfully and on time!")
        }
    }
}

/// Orchestrates the borrow/return lifecycle over the catalog and loan stores.
///
/// Each borrow and return holds the desk lock across its read-check-write
/// sequence, so two requests for the last copy cannot both pass the
/// availability check.
pub struct LendingEngine {
    catalog: CatalogStoreBox,
    loans: LoanStoreBox,
    policy: LendingPolicy,
    desk: Mutex<()>,
}

impl LendingEngine {
    /// Creates a new `LendingEngine`.
    ///
    /// # Arguments
    ///
    /// * `catalog` - The store holding books and their availability.
    /// * `loans` - The store holding borrow records.
    /// * `policy` - Loan period, borrow limit and fee schedule.
    pub fn new(catalog: CatalogStoreBox, loans: LoanStoreBox, policy: LendingPolicy) -> Self {
        Self {
            catalog,
            loans,
            policy,
            desk: Mutex::new(()),
        }
    }

    pub fn policy(&self) -> &LendingPolicy {
        &self.policy
    }

    /// Validates and catalogs a new title with every copy available.
    pub async fn add_book(
        &self,
        title: &str,
        author: &str,
        isbn: &str,
        total_copies: i64,
    ) -> Result<Book> {
        let new_book = NewBook::validate(title, author, isbn, total_copies)?;
        if self.catalog.find_by_isbn(&new_book.isbn).await?.is_some() {
            return Err(LibraryError::DuplicateIsbn);
        }

        let id = self.catalog.insert(new_book).await.map_err(|e| match e {
            LibraryError::DuplicateIsbn => e,
            _ => LibraryError::StorageError("adding the book".to_string()),
        })?;
        let book = self
            .catalog
            .find_by_id(id)
            .await?
            .ok_or_else(|| LibraryError::StorageError("adding the book".to_string()))?;
        info!(book_id = book.id, isbn = %book.isbn, "book cataloged");
        Ok(book)
    }

    /// Catalog search. An empty term or unknown kind yields no results rather than an error.
    pub async fn search(&self, term: &str, kind: &str) -> Result<Vec<Book>> {
        match BookQuery::parse(term, kind) {
            Some(query) => self.catalog.search(&query).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn find_book(&self, book_id: BookId) -> Result<Book> {
        self.catalog
            .find_by_id(book_id)
            .await?
            .ok_or(LibraryError::BookNotFound)
    }

    /// Lends a copy of the book to the patron, due one loan period from now.
    pub async fn borrow(&self, patron: &str, book_id: BookId) -> Result<BorrowReceipt> {
        self.borrow_at(patron, book_id, Utc::now()).await
    }

    /// Lends a copy of the book to the patron as of `now`.
    ///
    /// The borrow record is written before availability is decremented. If the
    /// second write fails the record stays and `StorageError` is returned.
    ///
    /// # Arguments
    ///
    /// * `patron` - The 6-digit patron id.
    /// * `book_id` - The book to lend.
    /// * `now` - The borrow instant; the due date is counted from it.
    pub async fn borrow_at(
        &self,
        patron: &str,
        book_id: BookId,
        now: DateTime<Utc>,
    ) -> Result<BorrowReceipt> {
        let patron = PatronId::parse(patron)?;
        let _desk = self.desk.lock().await;

        let book = self.find_book(book_id).await?;
        if book.available_copies == 0 {
            warn!(%patron, book_id, "borrow refused: no copies available");
            return Err(LibraryError::BookUnavailable);
        }

        let outstanding = self.loans.count_outstanding_for_patron(&patron).await?;
        // Only a count strictly above the limit is refused.
        if outstanding > self.policy.max_outstanding_borrows {
            warn!(%patron, outstanding, "borrow refused: limit reached");
            return Err(LibraryError::BorrowLimitExceeded {
                limit: self.policy.max_outstanding_borrows,
            });
        }

        if self
            .loans
            .latest_for(&patron, book_id)
            .await?
            .is_some_and(|r| r.is_outstanding())
        {
            warn!(%patron, book_id, "borrow refused: already holding a copy");
            return Err(LibraryError::AlreadyBorrowed);
        }

        let record = BorrowRecord::new(
            patron.clone(),
            book_id,
            now,
            self.policy.loan_period_days,
        );
        let due_at = record.due_at;

        self.loans.insert(record).await.map_err(|e| {
            error!(%patron, book_id, error = %e, "failed to store borrow record");
            LibraryError::StorageError("creating borrow record".to_string())
        })?;
        self.catalog.adjust_availability(book_id, -1).await.map_err(|e| {
            error!(%patron, book_id, error = %e, "failed to decrement availability");
            LibraryError::StorageError("updating book availability".to_string())
        })?;

        info!(%patron, book_id, due = %due_at, "book borrowed");
        Ok(BorrowReceipt {
            book_id,
            title: book.title,
            due_at,
        })
    }

    /// Takes back the patron's copy of the book and reports any fee owed.
    pub async fn return_book(&self, patron: &str, book_id: BookId) -> Result<ReturnReceipt> {
        self.return_book_at(patron, book_id, Utc::now()).await
    }

    /// Takes back the patron's copy of the book as of `now`.
    ///
    /// Both the restock and the return stamp are attempted; if either fails
    /// the return is reported as a `StorageError`.
    ///
    /// # Arguments
    ///
    /// * `patron` - The 6-digit patron id.
    /// * `book_id` - The book being returned.
    /// * `now` - The return instant; the fee is assessed up to it.
    pub async fn return_book_at(
        &self,
        patron: &str,
        book_id: BookId,
        now: DateTime<Utc>,
    ) -> Result<ReturnReceipt> {
        let patron = PatronId::parse(patron)?;
        let _desk = self.desk.lock().await;

        self.find_book(book_id).await?;

        let record = self
            .loans
            .latest_for(&patron, book_id)
            .await?
            .filter(BorrowRecord::is_outstanding)
            .ok_or_else(|| {
                warn!(%patron, book_id, "return refused: not borrowed by patron");
                LibraryError::NotBorrowedByPatron
            })?;

        let restocked = self.catalog.adjust_availability(book_id, 1).await;
        let stamped = self.loans.set_return_date(&patron, book_id, now).await;
        if let Err(e) = restocked.and(stamped) {
            error!(%patron, book_id, error = %e, "failed to record return");
            return Err(LibraryError::StorageError("recording the return".to_string()));
        }

        let assessment = fee::assess(record.due_at, now, &self.policy.fees);
        info!(
            %patron,
            book_id,
            days_overdue = assessment.days_overdue,
            fee = %assessment.fee_amount,
            "book returned"
        );
        Ok(ReturnReceipt {
            book_id,
            returned_at: now,
            assessment,
        })
    }

    /// Number of books the patron currently holds.
    ///
    /// # Arguments
    ///
    /// * `patron` - The 6-digit patron id.
    pub async fn borrow_count(&self, patron: &str) -> Result<usize> {
        let patron = PatronId::parse(patron)?;
        self.loans.count_outstanding_for_patron(&patron).await
    }

    /// The patron's unreturned loans, oldest first.
    pub async fn outstanding(&self, patron: &PatronId) -> Result<Vec<BorrowRecord>> {
        self.loans.outstanding_for_patron(patron).await
    }

    /// Late fee for the patron's current loan of the book, or for the most
    /// recent returned one, assessed up to its return.
    pub async fn assess_fee_at(
        &self,
        patron: &str,
        book_id: BookId,
        now: DateTime<Utc>,
    ) -> Result<FeeAssessment> {
        let patron = PatronId::parse(patron)?;
        let record = self
            .loans
            .latest_for(&patron, book_id)
            .await?
            .ok_or(LibraryError::FeeUnavailable)?;
        Ok(fee::assess(record.due_at, record.assessed_until(now), &self.policy.fees))
    }

    pub async fn assess_fee(&self, patron: &str, book_id: BookId) -> Result<FeeAssessment> {
        self.assess_fee_at(patron, book_id, Utc::now()).await
    }
}
