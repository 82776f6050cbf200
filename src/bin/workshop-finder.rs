//! Workshop lookup from the command line.
//!
//! Usage:
//!   workshop-finder "Workshop details.xlsx" --pincode 110001 --state DL
//!   workshop-finder workshops.csv --channel Dealer --output csv
//!   workshop-finder workshops.csv --list-selectors
//!
//! Every option can also be given through a `WORKSHOP_FINDER_*` environment variable. Set
//! `RUST_LOG=info` to see ingestion events.

use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use workshop_finder::ingestion::{
    CompositeObserver, ExcelSheetSelection, FileObserver, IngestionFormat, IngestionObserver, IngestionOptions,
    LogObserver,
};
use workshop_finder::processing::{Criteria, PincodeMissPolicy, Selector, ALL};
use workshop_finder::render::{write_results, write_selectors, OutputFormat, RenderOptions};
use workshop_finder::snapshot::DatasetStore;

#[derive(Parser, Debug)]
#[command(name = "workshop-finder")]
#[command(about = "Find workshops by pincode and filter by channel, body shop and state")]
#[command(version)]
struct Args {
    /// Workshop table (.xlsx/.xls/.ods, .csv, .json/.ndjson, .parquet)
    #[arg(env = "WORKSHOP_FINDER_FILE", default_value = "Workshop details.xlsx")]
    file: PathBuf,

    /// Force the input format instead of inferring it from the extension
    #[arg(long, value_enum, env = "WORKSHOP_FINDER_FORMAT")]
    format: Option<FormatArg>,

    /// Workbook sheet to read (defaults to the first sheet)
    #[arg(long, env = "WORKSHOP_FINDER_SHEET", conflicts_with = "all_sheets")]
    sheet: Option<String>,

    /// Read every sheet of the workbook and concatenate the rows
    #[arg(long)]
    all_sheets: bool,

    /// Pincode to look up (exact text match)
    #[arg(short, long, env = "WORKSHOP_FINDER_PINCODE", default_value = "")]
    pincode: String,

    /// Channel to keep, or "All"
    #[arg(long, env = "WORKSHOP_FINDER_CHANNEL", default_value = ALL)]
    channel: String,

    /// Body-shop value to keep, or "All"
    #[arg(long, env = "WORKSHOP_FINDER_BODY_SHOP", default_value = ALL)]
    body_shop: String,

    /// State to keep, or "All"
    #[arg(long, env = "WORKSHOP_FINDER_STATE", default_value = ALL)]
    state: String,

    /// Maximum number of rows a pincode lookup returns
    #[arg(short = 'n', long, env = "WORKSHOP_FINDER_LIMIT", default_value = "5")]
    limit: NonZeroUsize,

    /// What to show when the pincode matches nothing
    #[arg(long, value_enum, env = "WORKSHOP_FINDER_ON_MISS", default_value_t = MissArg::LeadingRows)]
    on_miss: MissArg,

    /// Output format
    #[arg(short, long, value_enum, env = "WORKSHOP_FINDER_OUTPUT", default_value_t = OutputArg::Table)]
    output: OutputArg,

    /// Print the choices for each selector and exit
    #[arg(long)]
    list_selectors: bool,

    /// Append ingestion events to this file
    #[arg(long, env = "WORKSHOP_FINDER_INGEST_LOG")]
    ingest_log: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
    Parquet,
    Excel,
}

impl From<FormatArg> for IngestionFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Csv => IngestionFormat::Csv,
            FormatArg::Json => IngestionFormat::Json,
            FormatArg::Parquet => IngestionFormat::Parquet,
            FormatArg::Excel => IngestionFormat::Excel,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MissArg {
    /// First rows of the whole table
    LeadingRows,
    /// Nothing
    Empty,
}

impl From<MissArg> for PincodeMissPolicy {
    fn from(m: MissArg) -> Self {
        match m {
            MissArg::LeadingRows => PincodeMissPolicy::LeadingRows,
            MissArg::Empty => PincodeMissPolicy::Empty,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputArg {
    Table,
    Csv,
    Json,
}

impl From<OutputArg> for OutputFormat {
    fn from(o: OutputArg) -> Self {
        match o {
            OutputArg::Table => OutputFormat::Table,
            OutputArg::Csv => OutputFormat::Csv,
            OutputArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let options = ingestion_options(args);
    let store = DatasetStore::open(&args.file, &options)
        .with_context(|| format!("loading {}", args.file.display()))?;
    let snapshot = store.snapshot();

    if snapshot.dataset().is_empty() {
        eprintln!("No data available. Please check the uploaded file.");
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.list_selectors {
        write_selectors(&mut out, snapshot.selectors())?;
        return Ok(out.flush()?);
    }

    let criteria = Criteria::new()
        .pincode(args.pincode.as_str())
        .channel(Selector::parse(&args.channel))
        .body_shop(Selector::parse(&args.body_shop))
        .state(Selector::parse(&args.state))
        .limit(args.limit.get())
        .on_miss(args.on_miss.into());

    for (field, selector) in snapshot.selectors().unknown_selectors(&criteria) {
        log::warn!("{field} '{selector}' does not occur in the dataset");
    }

    let rows = snapshot.query(&criteria);
    log::debug!("query {criteria:?} -> {} rows", rows.len());
    if rows.is_empty() {
        eprintln!("No results found for the selected filters.");
        return Ok(());
    }

    let render = RenderOptions {
        format: args.output.into(),
    };
    write_results(&mut out, &rows, &render).context("writing results")?;
    out.flush()?;
    Ok(())
}

fn ingestion_options(args: &Args) -> IngestionOptions {
    let mut observers: Vec<Arc<dyn IngestionObserver>> = vec![Arc::new(LogObserver)];
    if let Some(path) = &args.ingest_log {
        observers.push(Arc::new(FileObserver::new(path)));
    }

    IngestionOptions::default()
        .with_format(args.format.map(Into::into))
        .with_sheets(ExcelSheetSelection::from_flags(args.sheet.as_deref(), args.all_sheets))
        .with_observer(Arc::new(CompositeObserver::new(observers)))
}
