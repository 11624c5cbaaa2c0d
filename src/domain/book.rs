use crate::error::LibraryError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub type BookId = u32;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_AUTHOR_LEN: usize = 100;
pub const ISBN_LEN: usize = 13;

/// A catalogued title and its copy counts.
///
/// Invariant: `available_copies <= total_copies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub total_copies: u32,
    pub available_copies: u32,
}

/// A validated catalog entry waiting to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub total_copies: u32,
}

impl NewBook {
    /// Trims and validates the raw catalog fields.
    pub fn validate(
        title: &str,
        author: &str,
        isbn: &str,
        total_copies: i64,
    ) -> Result<Self, LibraryError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(LibraryError::InvalidBook("Title is required.".to_string()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(LibraryError::InvalidBook(
                "Title must be less than 200 characters.".to_string(),
            ));
        }

        let author = author.trim();
        if author.is_empty() {
            return Err(LibraryError::InvalidBook("Author is required.".to_string()));
        }
        if author.chars().count() > MAX_AUTHOR_LEN {
            return Err(LibraryError::InvalidBook(
                "Author must be less than 100 characters.".to_string(),
            ));
        }

        if !is_valid_isbn(isbn) {
            return Err(LibraryError::InvalidBook(
                "ISBN must be exactly 13 digits.".to_string(),
            ));
        }

        let total_copies = u32::try_from(total_copies)
            .ok()
            .filter(|copies| *copies > 0)
            .ok_or_else(|| {
                LibraryError::InvalidBook("Total copies must be a positive integer.".to_string())
            })?;

        Ok(Self {
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
            total_copies,
        })
    }
}

pub fn is_valid_isbn(isbn: &str) -> bool {
    isbn.len() == ISBN_LEN && isbn.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Isbn,
    Title,
    Author,
}

impl FromStr for SearchKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "isbn" => Ok(SearchKind::Isbn),
            "title" => Ok(SearchKind::Title),
            "author" => Ok(SearchKind::Author),
            _ => Err(()),
        }
    }
}

/// A catalog lookup. Title and author match case-insensitive substrings; ISBN matches exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookQuery {
    pub kind: SearchKind,
    pub term: String,
}

impl BookQuery {
    /// Returns `None` for an empty term or an unknown search kind.
    pub fn parse(term: &str, kind: &str) -> Option<Self> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }
        let kind = kind.parse().ok()?;
        Some(Self {
            kind,
            term: term.to_string(),
        })
    }

    pub fn matches(&self, book: &Book) -> bool {
        match self.kind {
            SearchKind::Isbn => book.isbn == self.term,
            SearchKind::Title => book.title.to_lowercase().contains(&self.term.to_lowercase()),
            SearchKind::Author => book.author.to_lowercase().contains(&self.term.to_lowercase()),
        }
    }
}
