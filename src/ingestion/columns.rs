//! Header normalization and required-column validation shared by every ingestion format.

use crate::error::{IngestionError, IngestionResult};
use crate::types::{REQUIRED_COLUMNS, Value, Workshop};

/// Normalize a raw header cell: surrounding whitespace is removed and the name is lowercased.
///
/// An empty header is named `unnamed: <idx>` after its 0-based position so the column still
/// passes through.
pub fn normalize_header(idx: usize, raw: &str) -> String {
    let name = raw.trim().to_lowercase();
    if name.is_empty() {
        format!("unnamed: {idx}")
    } else {
        name
    }
}

/// A validated, normalized header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HeaderRow {
    columns: Vec<String>,
}

impl HeaderRow {
    /// Normalize `raw` headers and validate them.
    ///
    /// Fails with [`IngestionError::SchemaMismatch`] if two headers normalize to the same name and
    /// with [`IngestionError::MissingColumns`] if any required column is absent.
    pub(crate) fn from_raw<I, S>(raw: I) -> IngestionResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut columns: Vec<String> = Vec::new();
        for (idx, h) in raw.into_iter().enumerate() {
            let name = normalize_header(idx, h.as_ref());
            if columns.contains(&name) {
                return Err(IngestionError::SchemaMismatch {
                    message: format!("duplicate column '{name}' after header normalization"),
                });
            }
            columns.push(name);
        }
        Self::validated(columns)
    }

    /// Validate already-normalized, duplicate-free columns.
    pub(crate) fn validated(columns: Vec<String>) -> IngestionResult<Self> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|req| !columns.iter().any(|c| c == *req))
            .map(|req| req.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(IngestionError::MissingColumns { missing });
        }
        Ok(Self { columns })
    }

    pub(crate) fn columns(&self) -> &[String] {
        &self.columns
    }

    pub(crate) fn into_columns(self) -> Vec<String> {
        self.columns
    }

    /// Build a record from cells given in header order. Missing trailing cells are null.
    pub(crate) fn record<I>(&self, cells: I) -> Workshop
    where
        I: IntoIterator<Item = Value>,
    {
        let mut cells = cells.into_iter();
        Workshop::from_cells(
            self.columns
                .iter()
                .map(|c| (c.clone(), cells.next().unwrap_or(Value::Null))),
        )
    }
}
