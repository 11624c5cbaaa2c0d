use super::command_reader::CommandKind;
use crate::domain::book::BookId;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Ok,
    Error,
}

/// The result of one desk command, as written to the output CSV.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct Outcome {
    pub command: CommandKind,
    pub patron: Option<String>,
    pub book: Option<BookId>,
    pub status: OutcomeStatus,
    pub message: String,
}

pub struct OutcomeWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> OutcomeWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write(&mut self, outcome: &Outcome) -> Result<(), csv::Error> {
        self.writer.serialize(outcome)
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}
