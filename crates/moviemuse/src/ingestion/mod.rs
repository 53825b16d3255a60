//! Document loading and ingestion into the vector store

mod loader;
mod pipeline;
mod splitter;

pub use loader::{CsvDocumentLoader, DEFAULT_SOURCE_NAME, MOVIE_COLUMNS, ROW_KEY, SOURCE_KEY};
pub use pipeline::{IngestReport, IngestionPipeline};
pub use splitter::DocumentSplitter;
