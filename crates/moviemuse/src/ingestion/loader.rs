//! CSV movie table to document loader

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::config::DatasetConfig;
use crate::error::{Error, Result};
use crate::types::{Document, Metadata};

/// Fixed column order of the movies table
pub const MOVIE_COLUMNS: [&str; 9] = [
    "index",
    "movie_name",
    "year_of_release",
    "category",
    "run_time",
    "genre",
    "imdb_rating",
    "votes",
    "gross_total",
];

/// Name recorded in the `source` metadata entry
pub const DEFAULT_SOURCE_NAME: &str = "movies.csv";

/// Metadata key naming the resource a document came from
pub const SOURCE_KEY: &str = "source";

/// Metadata key holding the 1-based position among ingested rows
pub const ROW_KEY: &str = "row";

/// Turns the fixed-schema movies CSV into one [`Document`] per row.
///
/// The header line is always skipped. `skip_leading_rows` additionally drops
/// that many data rows before numbering starts.
#[derive(Debug, Clone)]
pub struct CsvDocumentLoader {
    source_name: String,
    skip_leading_rows: usize,
}

impl CsvDocumentLoader {
    /// Create a loader that tags documents with `source_name`
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            skip_leading_rows: 0,
        }
    }

    /// Create a loader from dataset configuration
    pub fn from_config(config: &DatasetConfig) -> Self {
        Self::new(config.source_name.clone()).with_skip_leading_rows(config.skip_leading_rows)
    }

    /// Drop `rows` data rows after the header
    pub fn with_skip_leading_rows(mut self, rows: usize) -> Self {
        self.skip_leading_rows = rows;
        self
    }

    /// Open `path` and load every row.
    ///
    /// A missing or unreadable file is reported as [`Error::ResourceNotFound`].
    pub fn load_from_path(&self, path: &Path) -> Result<Vec<Document>> {
        let file = File::open(path).map_err(|e| {
            tracing::error!("Cannot open dataset {}: {}", path.display(), e);
            Error::resource_not_found(path.display().to_string())
        })?;

        // The reader (and the file handle with it) is dropped when this returns
        let documents = self.load_from_reader(BufReader::new(file))?;
        tracing::info!(
            "Loaded {} documents from {}",
            documents.len(),
            path.display()
        );
        Ok(documents)
    }

    /// Load every row from a comma-delimited stream with a header line.
    ///
    /// Fails the whole batch on the first malformed row.
    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<Vec<Document>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let mut documents = Vec::new();

        for (position, record) in csv_reader
            .records()
            .enumerate()
            .skip(self.skip_leading_rows)
        {
            // 1-based data row in the file, used for error reporting only
            let data_row = position as u64 + 1;
            let record = record.map_err(|e| Error::malformed_row(data_row, e.to_string()))?;

            if record.len() != MOVIE_COLUMNS.len() {
                return Err(Error::malformed_row(
                    data_row,
                    format!(
                        "expected {} fields, found {}",
                        MOVIE_COLUMNS.len(),
                        record.len()
                    ),
                ));
            }

            let row_number = documents.len() + 1;
            documents.push(self.build_document(row_number, record.iter()));
        }

        Ok(documents)
    }

    fn build_document<'a>(
        &self,
        row_number: usize,
        values: impl Iterator<Item = &'a str>,
    ) -> Document {
        let mut metadata = Metadata::new()
            .with(SOURCE_KEY, self.source_name.as_str())
            .with(ROW_KEY, row_number.to_string());

        let mut lines = Vec::with_capacity(MOVIE_COLUMNS.len());
        for (column, value) in MOVIE_COLUMNS.iter().zip(values) {
            metadata.insert(*column, value);
            lines.push(format!("{}:{}", column, value));
        }

        Document::new(lines.join("\n"), metadata)
    }
}

impl Default for CsvDocumentLoader {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_NAME)
    }
}
