use crate::domain::book::{Book, BookId, BookQuery, NewBook};
use crate::domain::loan::BorrowRecord;
use crate::domain::patron::PatronId;
use crate::domain::ports::{CatalogStore, LoanStore};
use crate::error::{LibraryError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory book catalog.
///
/// Ids are assigned sequentially from 1. Availability adjustments are
/// conditional updates taken under the write lock, so counts stay within
/// `0..=total_copies` no matter how callers interleave.
#[derive(Default, Clone)]
pub struct InMemoryCatalogStore {
    books: Arc<RwLock<BTreeMap<BookId, Book>>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn find_by_id(&self, book_id: BookId) -> Result<Option<Book>> {
        let books = self.books.read().await;
        Ok(books.get(&book_id).cloned())
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        let books = self.books.read().await;
        Ok(books.values().find(|b| b.isbn == isbn).cloned())
    }

    async fn insert(&self, book: NewBook) -> Result<BookId> {
        let mut books = self.books.write().await;
        if books.values().any(|b| b.isbn == book.isbn) {
            return Err(LibraryError::DuplicateIsbn);
        }
        let id = books.keys().next_back().map_or(1, |last| last + 1);
        books.insert(
            id,
            Book {
                id,
                title: book.title,
                author: book.author,
                isbn: book.isbn,
                total_copies: book.total_copies,
                available_copies: book.total_copies,
            },
        );
        Ok(id)
    }

    async fn adjust_availability(&self, book_id: BookId, delta: i32) -> Result<()> {
        let mut books = self.books.write().await;
        let book = books
            .get_mut(&book_id)
            .ok_or_else(|| LibraryError::StorageError("updating book availability".to_string()))?;

        let adjusted = i64::from(book.available_copies) + i64::from(delta);
        if adjusted < 0 || adjusted > i64::from(book.total_copies) {
            return Err(LibraryError::StorageError(
                "updating book availability".to_string(),
            ));
        }
        book.available_copies = adjusted as u32;
        Ok(())
    }

    async fn search(&self, query: &BookQuery) -> Result<Vec<Book>> {
        let books = self.books.read().await;
        let mut found: Vec<Book> = books
            .values()
            .filter(|b| query.matches(b))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(found)
    }
}

/// A thread-safe in-memory ledger of borrow records, kept in insertion order.
#[derive(Default, Clone)]
pub struct InMemoryLoanStore {
    records: Arc<RwLock<Vec<BorrowRecord>>>,
}

impl InMemoryLoanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoanStore for InMemoryLoanStore {
    async fn insert(&self, record: BorrowRecord) -> Result<()> {
        let mut records = self.records.write().await;
        let duplicate = records.iter().any(|r| {
            r.is_outstanding() && r.patron == record.patron && r.book_id == record.book_id
        });
        if duplicate {
            return Err(LibraryError::StorageError(
                "creating borrow record".to_string(),
            ));
        }
        records.push(record);
        Ok(())
    }

    async fn set_return_date(
        &self,
        patron: &PatronId,
        book_id: BookId,
        returned_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.is_outstanding() && &r.patron == patron && r.book_id == book_id)
            .ok_or_else(|| LibraryError::StorageError("updating return date".to_string()))?;
        record.returned_at = Some(returned_at);
        Ok(())
    }

    async fn outstanding_for_patron(&self, patron: &PatronId) -> Result<Vec<BorrowRecord>> {
        let records = self.records.read().await;
        let mut outstanding: Vec<BorrowRecord> = records
            .iter()
            .filter(|r| r.is_outstanding() && &r.patron == patron)
            .cloned()
            .collect();
        outstanding.sort_by_key(|r| r.borrowed_at);
        Ok(outstanding)
    }

    async fn count_outstanding_for_patron(&self, patron: &PatronId) -> Result<usize> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.is_outstanding() && &r.patron == patron)
            .count())
    }

    async fn latest_for(&self, patron: &PatronId, book_id: BookId) -> Result<Option<BorrowRecord>> {
        let records = self.records.read().await;
        let history = records
            .iter()
            .filter(|r| &r.patron == patron && r.book_id == book_id);

        if let Some(outstanding) = history.clone().find(|r| r.is_outstanding()) {
            return Ok(Some(outstanding.clone()));
        }
        Ok(history.max_by_key(|r| r.returned_at).cloned())
    }
}
