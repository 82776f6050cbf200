//! [`ResultSet`]: an ordered view of dataset rows.

use crate::types::{DataSet, Workshop};

/// Rows selected from a [`DataSet`], kept as strictly increasing row indices.
///
/// A result set borrows its dataset and can only refer to rows that exist in it, so it is always
/// an order-preserving subsequence of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet<'a> {
    dataset: &'a DataSet,
    indices: Vec<usize>,
}

impl<'a> ResultSet<'a> {
    /// Every row of `dataset`.
    pub fn all(dataset: &'a DataSet) -> Self {
        Self {
            dataset,
            indices: (0..dataset.row_count()).collect(),
        }
    }

    /// No rows of `dataset`.
    pub fn empty(dataset: &'a DataSet) -> Self {
        Self {
            dataset,
            indices: Vec::new(),
        }
    }

    /// Build from an iterator of row indices.
    ///
    /// Callers inside the engine only produce increasing, in-bounds indices.
    pub(crate) fn from_indices<I>(dataset: &'a DataSet, indices: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let indices: Vec<usize> = indices.into_iter().collect();
        debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(indices.last().is_none_or(|&i| i < dataset.row_count()));
        Self { dataset, indices }
    }

    /// The dataset the rows belong to.
    pub fn dataset(&self) -> &'a DataSet {
        self.dataset
    }

    /// Row indices into [`Self::dataset`], increasing.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` when no rows are selected.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate the selected records in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Workshop> + '_ {
        let records = self.dataset.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    /// Keep the first `n` rows.
    pub fn head(mut self, n: usize) -> Self {
        self.indices.truncate(n);
        self
    }

    /// Keep only rows for which `predicate` returns `true`, preserving order.
    pub fn retain<F>(mut self, mut predicate: F) -> Self
    where
        F: FnMut(&Workshop) -> bool,
    {
        let records = self.dataset.records();
        self.indices.retain(|&i| predicate(&records[i]));
        self
    }
}
