//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"pincode":"110001", ...}, ...]`
//! - A single JSON object (one row)
//! - Newline-delimited JSON (NDJSON): one object per line
//!
//! The column set is the union of all object keys (normalized, first-appearance order). A key that
//! is absent from a given object is null for that row.

use std::fs;
use std::path::Path;

use serde_json::Map;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, Value};

use super::columns::{normalize_header, HeaderRow};

/// Ingest a JSON file into an in-memory [`DataSet`].
pub fn ingest_json_from_path(path: impl AsRef<Path>) -> IngestionResult<DataSet> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text)
}

/// Ingest JSON from an in-memory string into a [`DataSet`].
pub fn ingest_json_from_str(input: &str) -> IngestionResult<DataSet> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match v {
            serde_json::Value::Array(items) => ingest_json_values(&items),
            serde_json::Value::Object(_) => ingest_json_values(std::slice::from_ref(&v)),
            _ => Err(IngestionError::SchemaMismatch {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        }
    } else {
        // Fall back to NDJSON.
        let mut values = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| IngestionError::Json {
                message: format!("invalid ndjson at line {}: {}", i + 1, e),
            })?;
            values.push(v);
        }
        ingest_json_values(&values)
    }
}

fn ingest_json_values(values: &[serde_json::Value]) -> IngestionResult<DataSet> {
    let mut objects: Vec<Vec<(String, &serde_json::Value)>> = Vec::with_capacity(values.len());
    let mut columns: Vec<String> = Vec::new();

    for (idx0, v) in values.iter().enumerate() {
        let row_num = idx0 + 1;
        let obj = v.as_object().ok_or_else(|| IngestionError::SchemaMismatch {
            message: format!("row {row_num} is not a json object"),
        })?;
        let normalized = normalize_object(row_num, obj)?;
        for (name, _) in &normalized {
            if !columns.contains(name) {
                columns.push(name.clone());
            }
        }
        objects.push(normalized);
    }

    let header = HeaderRow::validated(columns)?;
    let records = objects
        .iter()
        .map(|obj| {
            header.record(header.columns().iter().map(|col| {
                obj.iter()
                    .find(|(name, _)| name == col)
                    .map(|(_, jv)| convert_json_value(jv))
                    .unwrap_or(Value::Null)
            }))
        })
        .collect();

    Ok(DataSet::new(header.into_columns(), records))
}

fn normalize_object(
    row_num: usize,
    obj: &Map<String, serde_json::Value>,
) -> IngestionResult<Vec<(String, &serde_json::Value)>> {
    let mut out: Vec<(String, &serde_json::Value)> = Vec::with_capacity(obj.len());
    for (idx, (key, value)) in obj.iter().enumerate() {
        let name = normalize_header(idx, key);
        if out.iter().any(|(n, _)| *n == name) {
            return Err(IngestionError::SchemaMismatch {
                message: format!("row {row_num}: duplicate column '{name}' after key normalization"),
            });
        }
        out.push((name, value));
    }
    Ok(out)
}

fn convert_json_value(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int64(i),
            None => n.as_f64().map(Value::Float64).unwrap_or(Value::Null),
        },
        serde_json::Value::String(s) if s.trim().is_empty() => Value::Null,
        serde_json::Value::String(s) => Value::Utf8(s.clone()),
        other => Value::Utf8(other.to_string()),
    }
}
