use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by ingestion functions.
///
/// This is a single error enum shared across CSV/JSON/Parquet (and optional Excel) ingestion.
/// The query engine itself never fails; every error a caller can see comes from loading.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Excel ingestion error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Parquet ingestion error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Malformed JSON or NDJSON input.
    #[error("json error: {message}")]
    Json { message: String },

    /// One or more of the required workshop columns are absent after header normalization.
    ///
    /// `missing` lists the normalized column names in canonical order.
    #[error("missing columns in the dataset: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    /// The input does not have the shape of a workshop table (no header row, duplicate columns,
    /// non-object JSON rows, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },
}
