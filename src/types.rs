//! Core data model: cell values, workshop records and the in-memory [`DataSet`].
//!
//! A [`Workshop`] has typed fields for the four columns the lookup needs and an open map for every
//! other column of the source table. Column names are always the *normalized* names (trimmed and
//! lowercased) produced by ingestion.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Normalized name of the pincode column.
pub const PINCODE: &str = "pincode";
/// Normalized name of the channel column.
pub const CHANNEL: &str = "channel";
/// Normalized name of the body-shop column.
pub const BODY_SHOP: &str = "body shop";
/// Normalized name of the state column.
pub const STATE: &str = "state";

/// The columns every workshop table must carry, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 4] = [PINCODE, CHANNEL, BODY_SHOP, STATE];

/// A single typed cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Coerce the value to the text used for pincode/selector comparison.
    ///
    /// - `Null` has no text.
    /// - Strings are returned trimmed.
    /// - Floats with a zero fraction are written as integers, so a spreadsheet cell holding
    ///   `110001.0` compares equal to the pincode `"110001"`.
    ///
    /// Numbers are never re-parsed from text, so `"011001"` keeps its leading zero.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Utf8(s) => Some(s.trim().to_owned()),
            Value::Int64(v) => Some(v.to_string()),
            Value::Float64(v) => Some(float_to_text(*v)),
            Value::Bool(b) => Some(b.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Utf8(s) => f.write_str(s),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => f.write_str(&float_to_text(*v)),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

fn float_to_text(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        (v as i64).to_string()
    } else {
        v.to_string()
    }
}

/// One row of the workshop table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workshop {
    /// Pincode as text. `None` when the source cell was empty; such rows never match a lookup.
    pub pincode: Option<String>,
    /// Sales/service channel.
    pub channel: Option<String>,
    /// Body-shop classification.
    pub body_shop: Option<String>,
    /// State the workshop is located in.
    pub state: Option<String>,
    /// Every other column of the source table, keyed by normalized column name.
    pub extra: BTreeMap<String, Value>,
}

impl Workshop {
    /// Create a record with only a pincode set.
    pub fn new(pincode: impl Into<String>) -> Self {
        Self {
            pincode: Some(pincode.into()),
            ..Default::default()
        }
    }

    /// Set the channel.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Set the body-shop value.
    pub fn with_body_shop(mut self, body_shop: impl Into<String>) -> Self {
        self.body_shop = Some(body_shop.into());
        self
    }

    /// Set the state.
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Add a pass-through column.
    pub fn with_extra(mut self, column: impl Into<String>, value: Value) -> Self {
        self.extra.insert(column.into(), value);
        self
    }

    /// Build a record from `(normalized column name, cell)` pairs.
    ///
    /// Required columns are coerced to text with [`Value::to_text`]; an empty string becomes
    /// `None`. All other columns are stored unchanged in [`Workshop::extra`].
    pub fn from_cells<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut out = Self::default();
        for (column, value) in cells {
            let slot = match column.as_str() {
                PINCODE => &mut out.pincode,
                CHANNEL => &mut out.channel,
                BODY_SHOP => &mut out.body_shop,
                STATE => &mut out.state,
                _ => {
                    out.extra.insert(column, value);
                    continue;
                }
            };
            *slot = value.to_text().filter(|s| !s.is_empty());
        }
        out
    }

    /// Look up a cell by normalized column name.
    ///
    /// Required columns are returned as [`Value::Utf8`] (or [`Value::Null`]). Returns `None` if the
    /// column is not part of this record.
    pub fn get(&self, column: &str) -> Option<Value> {
        let text = |v: &Option<String>| v.clone().map(Value::Utf8).unwrap_or(Value::Null);
        match column {
            PINCODE => Some(text(&self.pincode)),
            CHANNEL => Some(text(&self.channel)),
            BODY_SHOP => Some(text(&self.body_shop)),
            STATE => Some(text(&self.state)),
            _ => self.extra.get(column).cloned(),
        }
    }
}

/// In-memory workshop table.
///
/// Rows keep source order. The dataset is never mutated after construction; queries borrow it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    columns: Vec<String>,
    records: Vec<Workshop>,
}

impl DataSet {
    /// Create a dataset from normalized column names (source order) and records.
    ///
    /// Callers are expected to pass columns that include [`REQUIRED_COLUMNS`]; ingestion
    /// guarantees this.
    pub fn new(columns: Vec<String>, records: Vec<Workshop>) -> Self {
        Self { columns, records }
    }

    /// Create a dataset from records alone.
    ///
    /// Columns are the required columns followed by every pass-through column seen, sorted.
    pub fn from_records(records: Vec<Workshop>) -> Self {
        let mut columns: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        let mut extra: Vec<&String> = records.iter().flat_map(|r| r.extra.keys()).collect();
        extra.sort();
        extra.dedup();
        columns.extend(extra.into_iter().cloned());
        Self { columns, records }
    }

    /// Normalized column names in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All records in source order.
    pub fn records(&self) -> &[Workshop] {
        &self.records
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
