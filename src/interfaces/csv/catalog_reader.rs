use serde::Deserialize;
use std::io::Read;

/// One row of a catalog import file: `title, author, isbn, copies`.
///
/// Fields are kept raw; validation happens when the book is added.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CatalogRow {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub copies: i64,
}

pub struct CatalogReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CatalogReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    pub fn rows(self) -> impl Iterator<Item = Result<CatalogRow, csv::Error>> {
        self.reader.into_deserialize()
    }
}
