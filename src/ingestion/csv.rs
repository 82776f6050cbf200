//! CSV ingestion implementation.

use std::path::Path;

use crate::error::IngestionResult;
use crate::types::{DataSet, Value};

use super::columns::HeaderRow;

/// Ingest a CSV workshop table into an in-memory [`DataSet`].
///
/// Rules:
///
/// - CSV must have a header row.
/// - Headers are normalized (trimmed, lowercased) and must contain all required columns
///   (order can differ).
/// - Every cell is kept as text, trimmed; empty cells become [`Value::Null`].
pub fn ingest_csv_from_path(path: impl AsRef<Path>) -> IngestionResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> IngestionResult<DataSet> {
    let header = HeaderRow::from_raw(rdr.headers()?.iter())?;

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result?;
        records.push(header.record(record.iter().map(text_cell)));
    }

    Ok(DataSet::new(header.into_columns(), records))
}

fn text_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Value::Null
    } else {
        Value::Utf8(trimmed.to_owned())
    }
}
