//! Immutable dataset snapshots and an atomically swappable store for them.
//!
//! Queries run against an `Arc<Snapshot>` obtained from [`DatasetStore::snapshot`]. A reload
//! builds a complete new snapshot before swapping the pointer, so a reader sees either the old
//! table or the new one, never a partially loaded one.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::IngestionResult;
use crate::ingestion::{ingest_from_path, IngestionOptions};
use crate::processing::{query, Criteria, ResultSet, SelectorOptions};
use crate::types::DataSet;

/// A loaded dataset together with the selector choices derived from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    dataset: DataSet,
    selectors: SelectorOptions,
}

impl Snapshot {
    /// Wrap a dataset and enumerate its selector choices.
    pub fn new(dataset: DataSet) -> Self {
        let selectors = SelectorOptions::from_dataset(&dataset);
        Self { dataset, selectors }
    }

    /// The dataset.
    pub fn dataset(&self) -> &DataSet {
        &self.dataset
    }

    /// Selector choices for this dataset.
    pub fn selectors(&self) -> &SelectorOptions {
        &self.selectors
    }

    /// Run [`query`] against this snapshot.
    pub fn query(&self, criteria: &Criteria) -> ResultSet<'_> {
        query(&self.dataset, criteria)
    }
}

/// Holds the current [`Snapshot`] and lets it be replaced while readers keep querying.
#[derive(Debug, Default)]
pub struct DatasetStore {
    current: RwLock<Arc<Snapshot>>,
}

impl DatasetStore {
    /// Create a store serving `dataset`.
    pub fn new(dataset: DataSet) -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot::new(dataset))),
        }
    }

    /// Load a store from a file.
    pub fn open(path: impl AsRef<Path>, options: &IngestionOptions) -> IngestionResult<Self> {
        Ok(Self::new(ingest_from_path(path, options)?))
    }

    /// The snapshot currently being served.
    ///
    /// The lock is only held while cloning the `Arc`; the caller queries without it.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in a new dataset and return the snapshot it replaced.
    pub fn replace(&self, dataset: DataSet) -> Arc<Snapshot> {
        let next = Arc::new(Snapshot::new(dataset));
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }

    /// Re-read the table from `path` and swap it in.
    ///
    /// On failure the current snapshot stays in place and the error is returned.
    pub fn reload(&self, path: impl AsRef<Path>, options: &IngestionOptions) -> IngestionResult<Arc<Snapshot>> {
        let dataset = ingest_from_path(path, options)?;
        log::info!("reloaded workshop table: {} rows", dataset.row_count());
        Ok(self.replace(dataset))
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::ingestion::IngestionFormat;
    use crate::processing::CategoricalField;
    use crate::types::Workshop;

    fn dataset(pins: &[&str]) -> DataSet {
        DataSet::from_records(pins.iter().map(|p| Workshop::new(*p).with_channel("A")).collect())
    }

    #[test]
    fn snapshot_enumerates_selectors_once() {
        let snap = Snapshot::new(dataset(&["1", "2"]));
        assert_eq!(snap.selectors().values(CategoricalField::Channel), ["A"]);
        assert_eq!(snap.query(&Criteria::new().pincode("2")).indices(), &[1]);
    }

    #[test]
    fn replace_does_not_disturb_held_snapshots() {
        let store = DatasetStore::new(dataset(&["1", "2"]));
        let before = store.snapshot();

        let old = store.replace(dataset(&["9"]));
        assert!(Arc::ptr_eq(&old, &before));

        // The held snapshot still answers from the old table.
        assert_eq!(before.query(&Criteria::new().pincode("2")).len(), 1);
        assert_eq!(store.snapshot().dataset().row_count(), 1);
    }

    #[test]
    fn failed_reload_keeps_current_snapshot() {
        let store = DatasetStore::new(dataset(&["1"]));
        let opts = IngestionOptions {
            format: Some(IngestionFormat::Csv),
            ..Default::default()
        };
        assert!(store.reload("does/not/exist.csv", &opts).is_err());
        assert_eq!(store.snapshot().dataset().row_count(), 1);
    }

    #[test]
    fn reload_swaps_in_the_new_table() {
        let store = DatasetStore::new(dataset(&["1"]));
        let before = store.snapshot();

        let old = store
            .reload("tests/fixtures/workshops.csv", &IngestionOptions::default())
            .unwrap();
        assert!(Arc::ptr_eq(&old, &before));

        let now = store.snapshot();
        assert_eq!(now.dataset().row_count(), 7);
        assert_eq!(now.query(&Criteria::new().pincode("011001")).indices(), &[2]);
        assert_eq!(before.dataset().row_count(), 1);
    }

    #[test]
    fn concurrent_readers_see_whole_snapshots() {
        let store = Arc::new(DatasetStore::new(dataset(&["1", "2", "3"])));
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let n = store.snapshot().dataset().row_count();
                        assert!(n == 3 || n == 5, "observed partial table with {n} rows");
                    }
                })
            })
            .collect();

        for _ in 0..50 {
            store.replace(dataset(&["1", "2", "3", "4", "5"]));
            store.replace(dataset(&["1", "2", "3"]));
        }
        for r in readers {
            r.join().unwrap();
        }
    }
}
