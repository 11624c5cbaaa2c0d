use crate::domain::book::BookId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Read;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Borrow,
    Return,
    Count,
    Fee,
    Pay,
    Refund,
    Report,
    Search,
}

/// One desk request: `command, patron, book, amount, reference, at`.
///
/// Only the columns a command needs have to be filled in. `at` overrides the
/// clock for that request.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Command {
    pub command: CommandKind,
    #[serde(default)]
    pub patron: Option<String>,
    #[serde(default)]
    pub book: Option<BookId>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
}

/// Reads desk commands from a CSV source.
///
/// Wraps `csv::Reader` with whitespace trimming and flexible record lengths,
/// and yields rows lazily so large scripts are streamed.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn commands(self) -> impl Iterator<Item = Result<Command, csv::Error>> {
        self.reader.into_deserialize()
    }
}
