//! Path-based loading of a workshop table.
//!
//! [`ingest_from_path`] resolves the table format (explicit, or from the file extension), runs
//! the matching reader and reports the outcome to the configured observer. Format resolution is
//! part of the reported attempt: an unknown extension reaches the observer as a failed load with
//! no format.

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::types::DataSet;

use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};
use super::{csv, json, parquet};

/// Table formats a workshop list can be loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// A JSON array of objects, a single object, or NDJSON.
    Json,
    /// Apache Parquet.
    Parquet,
    /// Spreadsheet workbooks (feature `excel`).
    Excel,
}

impl IngestionFormat {
    /// Map a file extension (case-insensitive) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" | "ndjson" => Some(Self::Json),
            "parquet" | "pq" => Some(Self::Parquet),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Lowercase name used in log lines.
    pub fn name(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Parquet => "parquet",
            Self::Excel => "excel",
        }
    }

    /// `explicit` if given, otherwise the format named by the extension of `path`.
    pub fn resolve(path: &Path, explicit: Option<Self>) -> IngestionResult<Self> {
        if let Some(format) = explicit {
            return Ok(format);
        }

        let ext = path.extension().and_then(OsStr::to_str).ok_or_else(|| IngestionError::SchemaMismatch {
            message: format!("cannot infer format: path has no extension ({})", path.display()),
        })?;

        Self::from_extension(ext).ok_or_else(|| IngestionError::SchemaMismatch {
            message: format!("cannot infer format from extension '{ext}' for path ({})", path.display()),
        })
    }
}

impl fmt::Display for IngestionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which sheets of a workbook make up the workshop table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExcelSheetSelection {
    /// The first sheet.
    #[default]
    First,
    /// One named sheet.
    Sheet(String),
    /// Every sheet, rows concatenated in workbook order.
    AllSheets,
    /// The listed sheets, rows concatenated in the given order.
    Sheets(Vec<String>),
}

impl ExcelSheetSelection {
    /// Selection from the usual pair of command-line switches. A named sheet wins over
    /// `all_sheets`.
    pub fn from_flags(sheet: Option<&str>, all_sheets: bool) -> Self {
        match (sheet, all_sheets) {
            (Some(name), _) => Self::Sheet(name.to_string()),
            (None, true) => Self::AllSheets,
            (None, false) => Self::First,
        }
    }

    #[cfg(feature = "excel")]
    fn read(&self, path: &Path) -> IngestionResult<DataSet> {
        use super::excel::{ingest_excel_from_path, ingest_excel_workbook_from_path};

        match self {
            Self::First => ingest_excel_from_path(path, None),
            Self::Sheet(name) => ingest_excel_from_path(path, Some(name.as_str())),
            Self::AllSheets => ingest_excel_workbook_from_path(path, None),
            Self::Sheets(names) => {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                ingest_excel_workbook_from_path(path, Some(names.as_slice()))
            }
        }
    }
}

/// Options for [`ingest_from_path`].
#[derive(Clone)]
pub struct IngestionOptions {
    /// Forced format; `None` resolves it from the file extension.
    pub format: Option<IngestionFormat>,
    /// Sheets to read when the table is a workbook.
    pub excel_sheet_selection: ExcelSheetSelection,
    /// Receives the outcome of every load attempt.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Failures at or above this severity are also sent to `on_alert`.
    pub alert_at_or_above: IngestionSeverity,
}

impl IngestionOptions {
    /// Force the table format.
    pub fn with_format(mut self, format: Option<IngestionFormat>) -> Self {
        self.format = format;
        self
    }

    /// Choose the workbook sheets.
    pub fn with_sheets(mut self, selection: ExcelSheetSelection) -> Self {
        self.excel_sheet_selection = selection;
        self
    }

    /// Report load outcomes to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn IngestionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Alert on failures at or above `severity`.
    pub fn alert_at(mut self, severity: IngestionSeverity) -> Self {
        self.alert_at_or_above = severity;
        self
    }
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("excel_sheet_selection", &self.excel_sheet_selection)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            excel_sheet_selection: ExcelSheetSelection::First,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Load a workshop table from `path`.
///
/// Headers are normalized and the required columns validated by the format reader. When an
/// observer is configured it gets `on_success` with row and column counts, or `on_failure` with
/// [`IngestionSeverity::of`] the error (plus `on_alert` once the severity reaches
/// `alert_at_or_above`).
///
/// ```no_run
/// use std::sync::Arc;
///
/// use workshop_finder::ingestion::{ingest_from_path, ExcelSheetSelection, IngestionOptions, LogObserver};
///
/// # fn main() -> Result<(), workshop_finder::IngestionError> {
/// let opts = IngestionOptions::default()
///     .with_sheets(ExcelSheetSelection::Sheet("North".to_string()))
///     .with_observer(Arc::new(LogObserver));
///
/// let ds = ingest_from_path("Workshop details.xlsx", &opts)?;
/// println!("rows={}", ds.row_count());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> IngestionResult<DataSet> {
    let path = path.as_ref();
    let format = IngestionFormat::resolve(path, options.format);

    let ctx = IngestionContext {
        path: path.to_path_buf(),
        format: format.as_ref().ok().copied(),
    };
    let result = format.and_then(|format| read_table(path, format, &options.excel_sheet_selection));

    if let Some(observer) = &options.observer {
        report(observer.as_ref(), &ctx, &result, options.alert_at_or_above);
    }
    result
}

fn read_table(path: &Path, format: IngestionFormat, sheets: &ExcelSheetSelection) -> IngestionResult<DataSet> {
    match format {
        IngestionFormat::Csv => csv::ingest_csv_from_path(path),
        IngestionFormat::Json => json::ingest_json_from_path(path),
        IngestionFormat::Parquet => parquet::ingest_parquet_from_path(path),
        #[cfg(feature = "excel")]
        IngestionFormat::Excel => sheets.read(path),
        #[cfg(not(feature = "excel"))]
        IngestionFormat::Excel => {
            let _ = sheets;
            Err(IngestionError::SchemaMismatch {
                message: "excel ingestion not enabled (enable cargo feature 'excel')".to_string(),
            })
        }
    }
}

fn report(
    observer: &dyn IngestionObserver,
    ctx: &IngestionContext,
    result: &IngestionResult<DataSet>,
    alert_at_or_above: IngestionSeverity,
) {
    match result {
        Ok(ds) => observer.on_success(ctx, IngestionStats::of(ds)),
        Err(e) => {
            let severity = IngestionSeverity::of(e);
            observer.on_failure(ctx, severity, e);
            if severity >= alert_at_or_above {
                observer.on_alert(ctx, severity, e);
            }
        }
    }
}
