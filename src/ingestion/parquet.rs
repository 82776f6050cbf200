//! Parquet ingestion implementation.

use std::path::Path;

use parquet::file::reader::{ChunkReader, FileReader};
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field;

use crate::error::IngestionResult;
use crate::types::{DataSet, Value};

use super::columns::HeaderRow;

/// Ingest a Parquet file into an in-memory [`DataSet`].
///
/// Notes:
/// - Columns are the top-level fields of the file schema, normalized like any other header
/// - Uses the Parquet record API (`RowIter`)
/// - Logical types without a direct [`Value`] counterpart (dates, decimals, groups, ...) are carried
///   as their display text
pub fn ingest_parquet_from_path(path: impl AsRef<Path>) -> IngestionResult<DataSet> {
    let reader = SerializedFileReader::try_from(path.as_ref())?;

    let source_names = top_level_field_names(&reader);
    let header = HeaderRow::from_raw(&source_names)?;

    let mut records = Vec::new();
    for row_res in reader.into_iter() {
        let row = row_res?;
        let cells = source_names.iter().map(|name| {
            row.get_column_iter()
                .find(|(col, _)| *col == name)
                .map(|(_, field)| convert_parquet_field(field))
                .unwrap_or(Value::Null)
        });
        records.push(header.record(cells));
    }

    Ok(DataSet::new(header.into_columns(), records))
}

fn top_level_field_names<R: ChunkReader + 'static>(reader: &SerializedFileReader<R>) -> Vec<String> {
    reader
        .metadata()
        .file_metadata()
        .schema()
        .get_fields()
        .iter()
        .map(|f| f.name().to_string())
        .collect()
}

fn convert_parquet_field(f: &Field) -> Value {
    match f {
        Field::Null => Value::Null,
        Field::Bool(b) => Value::Bool(*b),
        Field::Byte(v) => Value::Int64(i64::from(*v)),
        Field::Short(v) => Value::Int64(i64::from(*v)),
        Field::Int(v) => Value::Int64(i64::from(*v)),
        Field::Long(v) => Value::Int64(*v),
        Field::UByte(v) => Value::Int64(i64::from(*v)),
        Field::UShort(v) => Value::Int64(i64::from(*v)),
        Field::UInt(v) => Value::Int64(i64::from(*v)),
        Field::ULong(v) => match i64::try_from(*v) {
            Ok(i) => Value::Int64(i),
            Err(_) => Value::Utf8(v.to_string()),
        },
        Field::Float(v) => Value::Float64(f64::from(*v)),
        Field::Double(v) => Value::Float64(*v),
        Field::Str(s) if s.trim().is_empty() => Value::Null,
        Field::Str(s) => Value::Utf8(s.clone()),
        other => Value::Utf8(other.to_string()),
    }
}
