use std::fmt;
use thiserror::Error;

/// The external call a gateway outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayAction {
    Payment,
    Refund,
}

impl fmt::Display for GatewayAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayAction::Payment => f.write_str("Payment"),
            GatewayAction::Refund => f.write_str("Refund"),
        }
    }
}

/// Every rejection the lending, settlement and catalog services can report.
///
/// The `Display` text is the message shown to the patron or librarian.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LibraryError {
    #[error("Invalid patron ID. Must be exactly 6 digits.")]
    InvalidPatronId,
    #[error("Book not found.")]
    BookNotFound,
    #[error("This book is currently not available.")]
    BookUnavailable,
    #[error("You have reached the maximum borrowing limit of {limit} books.")]
    BorrowLimitExceeded { limit: usize },
    #[error("This book is already borrowed by this patron.")]
    AlreadyBorrowed,
    #[error("Book is not borrowed by this patron.")]
    NotBorrowedByPatron,
    #[error("No late fees to pay for this book.")]
    NoFeeDue,
    #[error("Unable to calculate late fees.")]
    FeeUnavailable,
    #[error("Invalid transaction ID.")]
    InvalidTransactionId,
    #[error("Refund amount must be greater than 0.")]
    InvalidAmount,
    #[error("Refund amount exceeds maximum late fee.")]
    AmountExceedsCap,
    #[error("{0}")]
    InvalidBook(String),
    #[error("A book with this ISBN already exists.")]
    DuplicateIsbn,
    #[error("Database error occurred while {0}.")]
    StorageError(String),
    #[error("{action} failed: {message}")]
    GatewayFailure {
        action: GatewayAction,
        message: String,
    },
    #[error("{action} processing error: {message}")]
    GatewayFault {
        action: GatewayAction,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, LibraryError>;
