//! The choices offered for each categorical selector.

use std::collections::HashSet;

use crate::types::DataSet;

use super::criteria::{CategoricalField, Criteria, Selector};

/// Distinct non-null values per categorical column, computed once per loaded dataset.
///
/// Channel and state values keep the order in which they first appear in the dataset; body-shop
/// values are sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorOptions {
    channels: Vec<String>,
    body_shops: Vec<String>,
    states: Vec<String>,
}

impl SelectorOptions {
    /// Collect the distinct values of each categorical column.
    pub fn from_dataset(dataset: &DataSet) -> Self {
        let distinct = |field: CategoricalField| {
            let mut seen: HashSet<&str> = HashSet::new();
            dataset
                .records()
                .iter()
                .filter_map(|w| field.value(w))
                .filter(|v| seen.insert(*v))
                .map(str::to_string)
                .collect::<Vec<_>>()
        };

        let mut body_shops = distinct(CategoricalField::BodyShop);
        body_shops.sort();

        Self {
            channels: distinct(CategoricalField::Channel),
            body_shops,
            states: distinct(CategoricalField::State),
        }
    }

    /// Distinct values of `field`, without the `All` sentinel.
    pub fn values(&self, field: CategoricalField) -> &[String] {
        match field {
            CategoricalField::Channel => &self.channels,
            CategoricalField::BodyShop => &self.body_shops,
            CategoricalField::State => &self.states,
        }
    }

    /// Valid selectors for `field`: [`Selector::All`] followed by every distinct value.
    pub fn choices(&self, field: CategoricalField) -> Vec<Selector> {
        std::iter::once(Selector::All)
            .chain(self.values(field).iter().cloned().map(Selector::Only))
            .collect()
    }

    /// Whether `selector` is one of the valid choices for `field`.
    pub fn contains(&self, field: CategoricalField, selector: &Selector) -> bool {
        match selector {
            Selector::All => true,
            Selector::Only(v) => self.values(field).contains(v),
        }
    }

    /// Selectors in `criteria` that are not among the enumerated choices.
    ///
    /// Such selectors are still valid input to [`super::query`]; they simply match no rows.
    pub fn unknown_selectors<'c>(&self, criteria: &'c Criteria) -> Vec<(CategoricalField, &'c Selector)> {
        CategoricalField::ALL
            .into_iter()
            .map(|field| (field, criteria.selector(field)))
            .filter(|(field, selector)| !self.contains(*field, selector))
            .collect()
    }
}
