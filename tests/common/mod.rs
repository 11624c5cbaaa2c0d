#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use library_lending::application::lending::LendingEngine;
use library_lending::config::LendingPolicy;
use library_lending::domain::book::{Book, BookId, BookQuery, NewBook};
use library_lending::domain::loan::BorrowRecord;
use library_lending::domain::money::Money;
use library_lending::domain::patron::PatronId;
use library_lending::domain::payment::{
    ChargeResponse, GatewayError, PaymentGateway, PaymentStatus, RefundResponse,
};
use library_lending::domain::ports::{CatalogStore, LoanStore};
use library_lending::error::{LibraryError, Result};
use library_lending::infrastructure::in_memory::{InMemoryCatalogStore, InMemoryLoanStore};
use std::sync::Mutex;

pub const PATRON: &str = "123456";

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 1, 9, 30, 0).unwrap()
}

pub async fn engine_with_catalog(
    catalog: &[(&str, &str, &str, i64)],
) -> (LendingEngine, Vec<BookId>) {
    let engine = LendingEngine::new(
        Box::new(InMemoryCatalogStore::new()),
        Box::new(InMemoryLoanStore::new()),
        LendingPolicy::default(),
    );
    let mut ids = Vec::new();
    for (title, author, isbn, copies) in catalog {
        ids.push(engine.add_book(title, author, isbn, *copies).await.unwrap().id);
    }
    (engine, ids)
}

/// A catalog of `n` single-copy books with generated ISBNs.
pub async fn engine_with_books(n: usize) -> (LendingEngine, Vec<BookId>) {
    let isbns: Vec<String> = (0..n).map(|i| format!("978000000{i:04}")).collect();
    let titles: Vec<String> = (0..n).map(|i| format!("Volume {i}")).collect();
    let catalog: Vec<(&str, &str, &str, i64)> = titles
        .iter()
        .zip(&isbns)
        .map(|(t, i)| (t.as_str(), "Anon", i.as_str(), 1))
        .collect();
    engine_with_catalog(&catalog).await
}

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Charge {
        patron_id: String,
        amount: Money,
        description: String,
    },
    Refund {
        transaction_id: String,
        amount: Money,
    },
}

/// What the recording gateway should do when called.
#[derive(Debug, Clone)]
pub enum Script {
    Approve,
    Decline(&'static str),
    Fault(&'static str),
}

/// A payment gateway double that records every call and answers from a script.
pub struct RecordingGateway {
    script: Script,
    calls: Mutex<Vec<GatewayCall>>,
}

impl RecordingGateway {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for RecordingGateway {
    async fn charge(
        &self,
        patron_id: &str,
        amount: Money,
        description: &str,
    ) -> std::result::Result<ChargeResponse, GatewayError> {
        self.calls.lock().unwrap().push(GatewayCall::Charge {
            patron_id: patron_id.to_string(),
            amount,
            description: description.to_string(),
        });
        match self.script {
            Script::Approve => Ok(ChargeResponse::approved(
                format!("txn_{patron_id}_001"),
                "Payment processed",
            )),
            Script::Decline(message) => Ok(ChargeResponse::declined(message)),
            Script::Fault(message) => Err(GatewayError::Transport(message.to_string())),
        }
    }

    async fn refund(
        &self,
        transaction_id: &str,
        amount: Money,
    ) -> std::result::Result<RefundResponse, GatewayError> {
        self.calls.lock().unwrap().push(GatewayCall::Refund {
            transaction_id: transaction_id.to_string(),
            amount,
        });
        match self.script {
            Script::Approve => Ok(RefundResponse {
                success: true,
                message: format!("Refund of ${amount} processed successfully"),
            }),
            Script::Decline(message) => Ok(RefundResponse {
                success: false,
                message: message.to_string(),
            }),
            Script::Fault(message) => Err(GatewayError::Transport(message.to_string())),
        }
    }

    async fn verify_status(
        &self,
        _transaction_id: &str,
    ) -> std::result::Result<PaymentStatus, GatewayError> {
        Ok(PaymentStatus::Completed)
    }
}

/// A loan store whose writes can be made to fail, for storage-error paths.
#[derive(Default)]
pub struct FlakyLoanStore {
    pub inner: InMemoryLoanStore,
    pub fail_inserts: bool,
    pub fail_returns: bool,
}

#[async_trait]
impl LoanStore for FlakyLoanStore {
    async fn insert(&self, record: BorrowRecord) -> Result<()> {
        if self.fail_inserts {
            return Err(LibraryError::StorageError("disk full".to_string()));
        }
        self.inner.insert(record).await
    }

    async fn set_return_date(
        &self,
        patron: &PatronId,
        book_id: BookId,
        returned_at: DateTime<Utc>,
    ) -> Result<()> {
        if self.fail_returns {
            return Err(LibraryError::StorageError("disk full".to_string()));
        }
        self.inner.set_return_date(patron, book_id, returned_at).await
    }

    async fn outstanding_for_patron(&self, patron: &PatronId) -> Result<Vec<BorrowRecord>> {
        self.inner.outstanding_for_patron(patron).await
    }

    async fn count_outstanding_for_patron(&self, patron: &PatronId) -> Result<usize> {
        self.inner.count_outstanding_for_patron(patron).await
    }

    async fn latest_for(&self, patron: &PatronId, book_id: BookId) -> Result<Option<BorrowRecord>> {
        self.inner.latest_for(patron, book_id).await
    }
}

/// A catalog whose availability updates can be made to fail, per direction.
#[derive(Default)]
pub struct FlakyCatalogStore {
    pub inner: InMemoryCatalogStore,
    pub fail_checkouts: bool,
    pub fail_restocks: bool,
}

#[async_trait]
impl CatalogStore for FlakyCatalogStore {
    async fn find_by_id(&self, book_id: BookId) -> Result<Option<Book>> {
        self.inner.find_by_id(book_id).await
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        self.inner.find_by_isbn(isbn).await
    }

    async fn insert(&self, book: NewBook) -> Result<BookId> {
        self.inner.insert(book).await
    }

    async fn adjust_availability(&self, book_id: BookId, delta: i32) -> Result<()> {
        if (delta < 0 && self.fail_checkouts) || (delta > 0 && self.fail_restocks) {
            return Err(LibraryError::StorageError("disk full".to_string()));
        }
        self.inner.adjust_availability(book_id, delta).await
    }

    async fn search(&self, query: &BookQuery) -> Result<Vec<Book>> {
        self.inner.search(query).await
    }
}
