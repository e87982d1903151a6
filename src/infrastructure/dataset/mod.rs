//! Bundled dataset implementations

mod csv;

pub use csv::{parse_embedding_csv, CsvEmbeddingDataset, CSV_HEADER};
