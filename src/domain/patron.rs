use crate::error::LibraryError;
use serde::{Serialize, Serializer};
use std::fmt;

/// A library card number: exactly 6 ASCII digits.
///
/// Patrons are not stored anywhere; they exist only through their borrow records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatronId(String);

impl PatronId {
    pub const LEN: usize = 6;

    pub fn parse(raw: &str) -> Result<Self, LibraryError> {
        if raw.len() == Self::LEN && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(LibraryError::InvalidPatronId)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for PatronId {
    type Error = LibraryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl fmt::Display for PatronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for PatronId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_patron_id() {
        let id = PatronId::parse("123456").unwrap();
        assert_eq!(id.as_str(), "123456");
        assert_eq!(id.to_string(), "123456");
    }

    #[test]
    fn test_invalid_patron_ids() {
        for raw in ["", "12345", "1234567", "12345a", "1AAAAA", " 12345", "１２３４５６"] {
            assert_eq!(
                PatronId::parse(raw),
                Err(LibraryError::InvalidPatronId),
                "{raw:?} should be rejected"
            );
        }
    }
}
