//! Pincode lookup.
//!
//! Pincodes are compared as text, exactly: no trimming, no case folding and no numeric
//! interpretation, so `"011001"` and `"11001"` are different pincodes. Spreadsheet numbers are
//! turned into text once, at load time (see [`crate::types::Value::to_text`]).

use crate::types::DataSet;

use super::criteria::PincodeMissPolicy;
use super::result::ResultSet;

/// Return up to `limit` records whose pincode equals `pincode`, in dataset order.
///
/// When nothing matches, the first `limit` rows of the whole dataset are returned instead (see
/// [`pincode_miss_fallback`]). Records with an empty pincode never match.
pub fn lookup_by_pincode<'a>(dataset: &'a DataSet, pincode: &str, limit: usize) -> ResultSet<'a> {
    lookup_by_pincode_with(dataset, pincode, limit, PincodeMissPolicy::LeadingRows)
}

/// [`lookup_by_pincode`] with an explicit miss policy.
pub fn lookup_by_pincode_with<'a>(
    dataset: &'a DataSet,
    pincode: &str,
    limit: usize,
    on_miss: PincodeMissPolicy,
) -> ResultSet<'a> {
    let mut hits = dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, w)| w.pincode.as_deref() == Some(pincode))
        .map(|(i, _)| i)
        .peekable();

    if hits.peek().is_none() {
        log::debug!("pincode '{pincode}' not found in {} rows; applying {on_miss:?}", dataset.row_count());
        return pincode_miss_fallback(dataset, limit, on_miss);
    }

    ResultSet::from_indices(dataset, hits.take(limit))
}

/// Rows returned when a pincode lookup finds no match.
///
/// With [`PincodeMissPolicy::LeadingRows`] this is the first `limit` rows of the unfiltered
/// dataset, which is what the workshop dashboard has always shown.
pub fn pincode_miss_fallback(dataset: &DataSet, limit: usize, on_miss: PincodeMissPolicy) -> ResultSet<'_> {
    match on_miss {
        PincodeMissPolicy::LeadingRows => ResultSet::all(dataset).head(limit),
        PincodeMissPolicy::Empty => ResultSet::empty(dataset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Workshop;

    fn sample_dataset() -> DataSet {
        DataSet::from_records(vec![
            Workshop::new("110001"),
            Workshop::new("110002"),
            Workshop::new("110001"),
            Workshop::new("011001"),
            Workshop::new("110001"),
            Workshop::default(),
        ])
    }

    #[test]
    fn returns_matches_in_dataset_order() {
        let ds = sample_dataset();
        let out = lookup_by_pincode(&ds, "110001", 5);
        assert_eq!(out.indices(), &[0, 2, 4]);
        assert!(out.iter().all(|w| w.pincode.as_deref() == Some("110001")));
    }

    #[test]
    fn caps_matches_at_limit() {
        let ds = sample_dataset();
        assert_eq!(lookup_by_pincode(&ds, "110001", 2).indices(), &[0, 2]);
    }

    #[test]
    fn miss_falls_back_to_leading_rows() {
        let ds = sample_dataset();
        assert_eq!(lookup_by_pincode(&ds, "999999", 3).indices(), &[0, 1, 2]);
        assert_eq!(lookup_by_pincode(&ds, "999999", 100).len(), ds.row_count());
    }

    #[test]
    fn comparison_is_exact_text() {
        let ds = sample_dataset();
        // Leading zeros matter and there is no trimming.
        assert_eq!(lookup_by_pincode(&ds, "011001", 5).indices(), &[3]);
        assert_eq!(lookup_by_pincode(&ds, "11001", 5).indices(), &[0, 1, 2, 3, 4]);
        assert_eq!(lookup_by_pincode(&ds, " 110002", 1).indices(), &[0]);
    }

    #[test]
    fn empty_pincode_never_matches_null_pincodes() {
        let ds = sample_dataset();
        assert_eq!(lookup_by_pincode(&ds, "", 1).indices(), &[0]);
    }

    #[test]
    fn empty_policy_returns_nothing_on_miss() {
        let ds = sample_dataset();
        let out = lookup_by_pincode_with(&ds, "999999", 5, PincodeMissPolicy::Empty);
        assert!(out.is_empty());
        let hit = lookup_by_pincode_with(&ds, "110002", 5, PincodeMissPolicy::Empty);
        assert_eq!(hit.indices(), &[1]);
    }

    #[test]
    fn zero_limit_yields_empty() {
        let ds = sample_dataset();
        assert!(lookup_by_pincode(&ds, "110001", 0).is_empty());
        assert!(lookup_by_pincode(&ds, "999999", 0).is_empty());
    }

    #[test]
    fn empty_dataset_yields_empty() {
        let ds = DataSet::default();
        assert!(lookup_by_pincode(&ds, "110001", 5).is_empty());
    }
}
