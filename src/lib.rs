//! `workshop-finder` loads a table of workshops and looks them up by pincode, optionally narrowed
//! by channel, body shop and state.
//!
//! The crate is split into a pure filter engine and the collaborators around it:
//!
//! - [`ingestion`]: reads CSV, JSON/NDJSON, Parquet and (feature `excel`, on by default) Excel
//!   workbooks into a [`types::DataSet`], normalizing headers and validating the required
//!   `pincode`, `channel`, `body shop` and `state` columns
//! - [`processing`]: the filter engine ([`processing::query`], [`processing::lookup_by_pincode`],
//!   [`processing::apply_categorical_filters`]) and selector enumeration
//! - [`snapshot`]: an immutable, atomically swappable dataset snapshot for long-running callers
//! - [`render`]: table / CSV / JSON output of results
//! - [`types`]: cell values, workshop records and the dataset
//! - [`error`]: the ingestion error type
//!
//! ## Lookup semantics
//!
//! - Pincodes are compared as text, exactly. `"011001"` is not `"11001"`.
//! - A pincode that matches nothing returns the first `limit` rows of the whole dataset rather
//!   than nothing ([`processing::PincodeMissPolicy::LeadingRows`]).
//! - The categorical selectors apply after the pincode lookup. `"All"` means no constraint.
//!
//! ## Example
//!
//! ```no_run
//! use workshop_finder::ingestion::{ingest_from_path, IngestionOptions};
//! use workshop_finder::processing::{query, Criteria};
//!
//! # fn main() -> Result<(), workshop_finder::IngestionError> {
//! let ds = ingest_from_path("Workshop details.xlsx", &IngestionOptions::default())?;
//! let rows = query(&ds, &Criteria::new().pincode("110001").state("DL"));
//! for w in rows.iter() {
//!     println!("{:?} {:?}", w.pincode, w.extra.get("workshop name"));
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod ingestion;
pub mod processing;
pub mod render;
pub mod snapshot;
pub mod types;

pub use error::{IngestionError, IngestionResult};
