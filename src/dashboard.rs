use std::path::Path;

use crate::charts::pie::PieTarget;
use crate::charts::{bubble, pie, ChartSpec};
use crate::data::loader::load_file;
use crate::data::model::FitnessDataset;
use crate::data::partition::CohortPartition;
use crate::data::table::DataTable;
use crate::error::DataLoadError;

// ---------------------------------------------------------------------------
// Dashboard – immutable context shared by every render
// ---------------------------------------------------------------------------

/// Everything derived once at startup: dataset, cohort subsets, the
/// unlabeled table and the charts that never change.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub dataset: FitnessDataset,
    pub partition: CohortPartition,
    bubble: ChartSpec,
    pie_fitbit: ChartSpec,
    pie_personal: ChartSpec,
}

impl Dashboard {
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        Ok(Self::new(load_file(path)?))
    }

    pub fn new(dataset: FitnessDataset) -> Self {
        let partition = CohortPartition::new(&dataset);
        debug_assert_eq!(partition.total(), dataset.len());
        for cohort in partition.cohorts() {
            log::debug!(
                "{cohort}: {} records",
                partition.records(&dataset, cohort).count()
            );
        }

        let bubble = bubble::build(&dataset);
        let pie_fitbit = pie::build(&dataset, partition.peers(), PieTarget::Fitbit);
        let pie_personal = pie::build(&dataset, partition.personal(), PieTarget::Personal);

        Dashboard {
            dataset,
            partition,
            bubble,
            pie_fitbit,
            pie_personal,
        }
    }

    pub fn table(&self) -> &DataTable {
        &self.partition.table
    }

    pub fn bubble(&self) -> &ChartSpec {
        &self.bubble
    }

    pub fn pie(&self, target: PieTarget) -> &ChartSpec {
        match target {
            PieTarget::Fitbit => &self.pie_fitbit,
            PieTarget::Personal => &self.pie_personal,
        }
    }
}
