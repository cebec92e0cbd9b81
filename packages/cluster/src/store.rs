//! Dataset-keyed cache of clustering indexes.
//!
//! An explicitly owned store passed into the layer assembler, not a
//! hidden global. Entries are inserted on first render of a dataset,
//! overwritten on refetch, and removed by explicit invalidation.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::index::ClusterIndex;

/// Cache mapping dataset id to its clustering index.
#[derive(Default)]
pub struct ClusterStore {
    entries: BTreeMap<Uuid, ClusterIndex>,
}

impl ClusterStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached index for a dataset, if any.
    #[must_use]
    pub fn get(&self, dataset_id: Uuid) -> Option<&ClusterIndex> {
        self.entries.get(&dataset_id)
    }

    /// Returns `true` if an index is cached for the dataset.
    #[must_use]
    pub fn contains(&self, dataset_id: Uuid) -> bool {
        self.entries.contains_key(&dataset_id)
    }

    /// Inserts or replaces a dataset's index. A replace corresponds to
    /// a refetch of the dataset's features; the last write wins.
    pub fn insert(&mut self, dataset_id: Uuid, index: ClusterIndex) {
        if self.entries.insert(dataset_id, index).is_some() {
            log::debug!("Replaced cluster index for dataset {dataset_id}");
        }
    }

    /// Removes one dataset's index, returning whether it was present.
    pub fn invalidate(&mut self, dataset_id: Uuid) -> bool {
        let removed = self.entries.remove(&dataset_id).is_some();
        if removed {
            log::debug!("Invalidated cluster index for dataset {dataset_id}");
        }
        removed
    }

    /// Drops every cached index.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            log::debug!("Cleared {} cluster indexes", self.entries.len());
        }
        self.entries.clear();
    }

    /// Number of cached indexes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no index is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
