//! Observer hooks for workshop-table ingestion: logging, append-only log files and fan-out.

use std::error::Error as StdError;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::IngestionError;
use crate::types::DataSet;

use super::unified::IngestionFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

impl IngestionSeverity {
    /// Classify a load failure.
    ///
    /// Anything caused by I/O (a missing or unreadable file, including I/O wrapped by the CSV,
    /// Parquet or workbook readers) is `Critical`; a file that is readable but not a workshop
    /// table is `Error`.
    pub fn of(error: &IngestionError) -> Self {
        match error {
            IngestionError::Csv(err) if matches!(err.kind(), ::csv::ErrorKind::Io(_)) => Self::Critical,
            other if caused_by_io(other) => Self::Critical,
            _ => Self::Error,
        }
    }
}

fn caused_by_io(error: &(dyn StdError + 'static)) -> bool {
    let mut cur = Some(error);
    while let Some(err) = cur {
        if err.is::<io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

/// Context about an ingestion attempt of a workshop table.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// The input path used for ingestion.
    pub path: PathBuf,
    /// Resolved table format; `None` when it could not be resolved from the path.
    pub format: Option<IngestionFormat>,
}

/// Minimal stats reported on successful ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    /// Number of ingested workshop rows.
    pub rows: usize,
    /// Number of columns after header normalization (required and pass-through).
    pub columns: usize,
}

impl IngestionStats {
    /// Counts for a loaded dataset.
    pub fn of(dataset: &DataSet) -> Self {
        Self {
            rows: dataset.row_count(),
            columns: dataset.columns().len(),
        }
    }
}

/// Observer interface for ingestion outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts. A failed reload through
/// [`crate::snapshot::DatasetStore::reload`] is reported here too, while the previous snapshot
/// keeps serving queries.
pub trait IngestionObserver: Send + Sync {
    /// Called when ingestion succeeds.
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    /// Called when ingestion fails.
    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &IngestionError) {}

    /// Called when an ingestion failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// One observed ingestion outcome, rendered the same way by every built-in observer.
#[derive(Debug, Clone, Copy)]
enum Outcome<'a> {
    Ok(IngestionStats),
    Failed(IngestionSeverity, &'a IngestionError),
    Alert(IngestionSeverity, &'a IngestionError),
}

fn describe(ctx: &IngestionContext, outcome: Outcome<'_>) -> String {
    let format = ctx.format.map_or("unknown", IngestionFormat::name);
    let target = format!("format={format} path={}", ctx.path.display());
    match outcome {
        Outcome::Ok(stats) => format!("ok {target} rows={} columns={}", stats.rows, stats.columns),
        Outcome::Failed(sev, err) => format!("fail severity={sev:?} {target} err={err}"),
        Outcome::Alert(sev, err) => format!("ALERT severity={sev:?} {target} err={err}"),
    }
}

/// Forwards ingestion events to the [`log`] facade.
///
/// Successes are logged at `info`, failures at `warn` (`error` when critical) and alerts at
/// `error`.
#[derive(Debug, Default)]
pub struct LogObserver;

impl IngestionObserver for LogObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        log::info!("[ingest] {}", describe(ctx, Outcome::Ok(stats)));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        let level = if severity >= IngestionSeverity::Critical {
            log::Level::Error
        } else {
            log::Level::Warn
        };
        log::log!(level, "[ingest] {}", describe(ctx, Outcome::Failed(severity, error)));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        log::error!("[ingest] {}", describe(ctx, Outcome::Alert(severity, error)));
    }
}

/// Appends one line per ingestion event to a local log file, prefixed with a unix timestamp.
///
/// Writes are best-effort; failures to open/write the log file are ignored so that logging can
/// never fail a load.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn record(&self, ctx: &IngestionContext, outcome: Outcome<'_>) {
        let line = format!("{} {}", unix_ts(), describe(ctx, outcome));
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl IngestionObserver for FileObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.record(ctx, Outcome::Ok(stats));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.record(ctx, Outcome::Failed(severity, error));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.record(ctx, Outcome::Alert(severity, error));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
