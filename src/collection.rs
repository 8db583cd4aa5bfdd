//! Merged catalog of resolved detail records

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::state::DetailRecord;

/// Records from the last completed fetch cycle.
///
/// Only ever replaced wholesale. Holds at most one record per name and keeps
/// them ordered by id, since the aggregator returns them in completion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    records: Vec<DetailRecord>,
}

impl Collection {
    pub fn from_records(records: Vec<DetailRecord>) -> Self {
        let mut collection = Self::default();
        collection.replace(records);
        collection
    }

    /// Swap in a new set of records, returning how many duplicates were dropped
    pub fn replace(&mut self, mut records: Vec<DetailRecord>) -> usize {
        records.sort_by_key(|record| record.id);
        let before = records.len();
        let mut seen = HashSet::with_capacity(before);
        records.retain(|record| seen.insert(record.name.clone()));
        self.records = records;
        before - self.records.len()
    }

    pub fn all(&self) -> &[DetailRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
