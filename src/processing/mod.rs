//! The workshop filter engine.
//!
//! The engine operates on an already-validated [`crate::types::DataSet`] and never fails. It is a
//! set of pure functions:
//!
//! - [`lookup_by_pincode()`]: exact-text pincode match capped at a limit, with a fallback to the
//!   leading rows of the dataset when nothing matches
//! - [`apply_categorical_filters()`]: AND of channel / body-shop / state selectors
//! - [`query()`]: the composition of the two, driven by [`Criteria`]
//! - [`SelectorOptions`]: the valid choices for each selector
//!
//! Every function returns a [`ResultSet`] that borrows the dataset, so results are always an
//! order-preserving subsequence of its rows.
//!
//! ## Example
//!
//! ```rust
//! use workshop_finder::processing::{query, Criteria};
//! use workshop_finder::types::{DataSet, Workshop};
//!
//! let ds = DataSet::from_records(vec![
//!     Workshop::new("110001").with_channel("A").with_body_shop("X").with_state("DL"),
//!     Workshop::new("110002").with_channel("B").with_body_shop("Y").with_state("DL"),
//! ]);
//!
//! let hit = query(&ds, &Criteria::new().pincode("110002"));
//! assert_eq!(hit.indices(), &[1]);
//!
//! // Unknown pincode: the first `limit` rows of the whole dataset.
//! let miss = query(&ds, &Criteria::new().pincode("999999").limit(1));
//! assert_eq!(miss.indices(), &[0]);
//!
//! let by_channel = query(&ds, &Criteria::new().channel("B"));
//! assert_eq!(by_channel.indices(), &[1]);
//! ```

pub mod criteria;
pub mod filter;
pub mod lookup;
pub mod query;
pub mod result;
pub mod selectors;

pub use criteria::{CategoricalField, Criteria, PincodeMissPolicy, Selector, ALL, DEFAULT_LIMIT};
pub use filter::{apply_categorical_filters, filter_field};
pub use lookup::{lookup_by_pincode, lookup_by_pincode_with, pincode_miss_fallback};
pub use query::query;
pub use result::ResultSet;
pub use selectors::SelectorOptions;
