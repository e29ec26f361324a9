/// Data layer: core types, loading, cohort labelling and partitioning.
///
/// Architecture:
/// ```text
///  .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<Record>, rename headline columns
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │FitnessDataset │  records + one Cohort per record
///   └──────────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ partition  │  cohort → record indices, unlabeled DataTable
///   └───────────┘
/// ```

pub mod cohort;
pub mod loader;
pub mod model;
pub mod partition;
pub mod table;
