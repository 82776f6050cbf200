#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, Value, Workshop};

use super::columns::HeaderRow;

/// Ingest an Excel document (`.xlsx`, `.xls`, `.ods`, etc.) into an in-memory `DataSet`.
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Normalizes headers and validates that all required columns exist
/// - Reads remaining rows, skipping blank ones; empty and error cells become [`Value::Null`]
pub fn ingest_excel_from_path(path: impl AsRef<Path>, sheet_name: Option<&str>) -> IngestionResult<DataSet> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| IngestionError::SchemaMismatch {
                message: "workbook has no sheets".to_string(),
            })?,
    };

    let range = workbook.worksheet_range(&sheet)?;
    let (header, records) = ingest_sheet_range(&sheet, &range)?;
    Ok(DataSet::new(header.into_columns(), records))
}

/// Ingest multiple sheets from an Excel workbook and concatenate all rows into one `DataSet`.
///
/// - If `sheet_names` is `None`, ingests **all sheets** in workbook order.
/// - If `sheet_names` is `Some(&[...])`, ingests only those sheets (in the provided order).
///
/// The dataset's columns are those of the first sheet followed by any column only later sheets
/// carry. Each sheet must carry the required columns on its own.
pub fn ingest_excel_workbook_from_path(
    path: impl AsRef<Path>,
    sheet_names: Option<&[&str]>,
) -> IngestionResult<DataSet> {
    let mut workbook = open_workbook_auto(path)?;

    let sheets: Vec<String> = match sheet_names {
        Some(names) => names.iter().map(|s| s.to_string()).collect(),
        None => workbook.sheet_names().to_vec(),
    };
    if sheets.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "workbook has no sheets".to_string(),
        });
    }

    let mut columns: Vec<String> = Vec::new();
    let mut all_records: Vec<Workshop> = Vec::new();
    for sheet in sheets {
        let range = workbook.worksheet_range(&sheet)?;
        let (header, mut records) = ingest_sheet_range(&sheet, &range)?;
        for c in header.into_columns() {
            if !columns.contains(&c) {
                columns.push(c);
            }
        }
        all_records.append(&mut records);
    }

    Ok(DataSet::new(columns, all_records))
}

fn ingest_sheet_range(sheet: &str, range: &calamine::Range<Data>) -> IngestionResult<(HeaderRow, Vec<Workshop>)> {
    let (header_row_idx, header) =
        build_header(range).map_err(|e| wrap_schema_err_with_sheet(sheet, e))?;

    let records = range
        .rows()
        .skip(header_row_idx + 1)
        .filter(|row| !is_blank_row(row))
        .map(|row| header.record(row.iter().map(convert_cell)))
        .collect();

    Ok((header, records))
}

fn wrap_schema_err_with_sheet(sheet: &str, err: IngestionError) -> IngestionError {
    match err {
        IngestionError::SchemaMismatch { message } => IngestionError::SchemaMismatch {
            message: format!("sheet '{sheet}': {message}"),
        },
        other => other,
    }
}

fn build_header(range: &calamine::Range<Data>) -> IngestionResult<(usize, HeaderRow)> {
    let (idx0, row) = range
        .rows()
        .enumerate()
        .find(|(_, row)| !is_blank_row(row))
        .ok_or_else(|| IngestionError::SchemaMismatch {
            message: "sheet has no non-empty rows (no header row found)".to_string(),
        })?;

    let header = HeaderRow::from_raw(row.iter().map(cell_to_header_string))?;
    Ok((idx0, header))
}

/// Spacer rows (every cell empty or whitespace) are not workshops.
fn is_blank_row(row: &[Data]) -> bool {
    row.iter().all(|c| convert_cell(c).is_null() && !matches!(c, Data::Error(_)))
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => convert_cell(other).to_string(),
    }
}

fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) if s.trim().is_empty() => Value::Null,
        Data::String(s) => Value::Utf8(s.clone()),
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => Value::Float64(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Utf8(s.clone()),
        Data::DateTime(dt) => Value::Utf8(dt.to_string()),
    }
}
