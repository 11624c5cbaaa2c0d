use super::book::{Book, BookId, BookQuery, NewBook};
use super::loan::BorrowRecord;
use super::patron::PatronId;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_by_id(&self, book_id: BookId) -> Result<Option<Book>>;
    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>>;
    async fn insert(&self, book: NewBook) -> Result<BookId>;
    /// Moves `available_copies` by `delta`, failing if the result would leave `0..=total_copies`.
    async fn adjust_availability(&self, book_id: BookId, delta: i32) -> Result<()>;
    /// Matching books ordered by title.
    async fn search(&self, query: &BookQuery) -> Result<Vec<Book>>;
}

#[async_trait]
pub trait LoanStore: Send + Sync {
    async fn insert(&self, record: BorrowRecord) -> Result<()>;
    /// Stamps the patron's outstanding record for `book_id` as returned.
    async fn set_return_date(
        &self,
        patron: &PatronId,
        book_id: BookId,
        returned_at: DateTime<Utc>,
    ) -> Result<()>;
    /// Outstanding records, oldest borrow first.
    async fn outstanding_for_patron(&self, patron: &PatronId) -> Result<Vec<BorrowRecord>>;
    async fn count_outstanding_for_patron(&self, patron: &PatronId) -> Result<usize>;
    /// The outstanding record for the pair if one exists, otherwise the most recently returned one.
    async fn latest_for(&self, patron: &PatronId, book_id: BookId) -> Result<Option<BorrowRecord>>;
}

pub type CatalogStoreBox = Box<dyn CatalogStore>;
pub type LoanStoreBox = Box<dyn LoanStore>;
