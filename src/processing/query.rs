//! Top-level query: pincode lookup followed by categorical filters.

use crate::types::DataSet;

use super::criteria::Criteria;
use super::filter::apply_categorical_filters;
use super::lookup::lookup_by_pincode_with;
use super::result::ResultSet;

/// Run a workshop query.
///
/// 1. Start from the full dataset.
/// 2. If `criteria` carries a non-empty pincode, replace the working set with the pincode lookup
///    against the **full** dataset, capped at `criteria.limit` (with the miss policy applied).
/// 3. Apply the channel / body-shop / state selectors to the working set.
///
/// The limit only caps the pincode lookup; without a pincode every row passing the selectors is
/// returned. The query is pure: the same dataset and criteria always give the same rows.
pub fn query<'a>(dataset: &'a DataSet, criteria: &Criteria) -> ResultSet<'a> {
    let working = match criteria.pincode_filter() {
        Some(pincode) => lookup_by_pincode_with(dataset, pincode, criteria.limit, criteria.on_miss),
        None => ResultSet::all(dataset),
    };

    apply_categorical_filters(working, &criteria.channel, &criteria.body_shop, &criteria.state)
}
