use std::collections::BTreeMap;

use super::cohort::Cohort;
use super::model::{FitnessDataset, Record};
use super::table::DataTable;

// ---------------------------------------------------------------------------
// CohortPartition – subsets by cohort label plus the unlabeled table
// ---------------------------------------------------------------------------

/// Record indices grouped by cohort, in source order within each subset.
///
/// Every record index appears in exactly one subset.
#[derive(Debug, Clone)]
pub struct CohortPartition {
    subsets: BTreeMap<Cohort, Vec<usize>>,
    /// Non-personal records in source order.
    peers: Vec<usize>,
    /// Full table without the cohort label, for display and export.
    pub table: DataTable,
}

impl CohortPartition {
    pub fn new(dataset: &FitnessDataset) -> Self {
        let mut subsets: BTreeMap<Cohort, Vec<usize>> = BTreeMap::new();
        let mut peers = Vec::new();

        for (idx, cohort) in dataset.cohorts.iter().enumerate() {
            subsets.entry(*cohort).or_default().push(idx);
            if !cohort.is_personal() {
                peers.push(idx);
            }
        }

        CohortPartition {
            subsets,
            peers,
            table: DataTable::from_dataset(dataset),
        }
    }

    /// Indices of the records labeled `cohort` (empty if none).
    pub fn indices(&self, cohort: Cohort) -> &[usize] {
        self.subsets.get(&cohort).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn personal(&self) -> &[usize] {
        self.indices(Cohort::Personal)
    }

    pub fn peers(&self) -> &[usize] {
        &self.peers
    }

    /// Cohorts present in the data, personal first.
    pub fn cohorts(&self) -> impl Iterator<Item = Cohort> + '_ {
        self.subsets.keys().copied()
    }

    /// Resolve a subset's indices to records.
    pub fn records<'a>(
        &'a self,
        dataset: &'a FitnessDataset,
        cohort: Cohort,
    ) -> impl Iterator<Item = &'a Record> + 'a {
        self.indices(cohort).iter().map(move |&i| &dataset.records[i])
    }

    /// Sum of all subset sizes.
    pub fn total(&self) -> usize {
        self.subsets.values().map(Vec::len).sum()
    }
}
