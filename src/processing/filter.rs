//! Categorical filtering of a [`ResultSet`].

use super::criteria::{CategoricalField, Selector};
use super::result::ResultSet;

/// Keep only rows whose channel, body shop and state pass the given selectors.
///
/// [`Selector::All`] puts no constraint on its field; a concrete selector keeps rows whose field
/// equals it exactly. The three constraints are AND-ed, so their order does not matter. Surviving
/// rows keep their relative order.
pub fn apply_categorical_filters<'a>(
    rows: ResultSet<'a>,
    channel: &Selector,
    body_shop: &Selector,
    state: &Selector,
) -> ResultSet<'a> {
    [
        (CategoricalField::Channel, channel),
        (CategoricalField::BodyShop, body_shop),
        (CategoricalField::State, state),
    ]
    .into_iter()
    .fold(rows, |acc, (field, selector)| filter_field(acc, field, selector))
}

/// Apply a single categorical constraint.
pub fn filter_field<'a>(rows: ResultSet<'a>, field: CategoricalField, selector: &Selector) -> ResultSet<'a> {
    if selector.is_all() {
        return rows;
    }
    rows.retain(|w| selector.matches(field.value(w)))
}
