use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;

use super::cohort::{assign_cohorts, Cohort};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the source table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes found in activity exports.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    /// Date kept as the source text so exports reproduce it verbatim.
    Date(String),
    Null,
}

impl CellValue {
    /// Interpret the value as an `f64` for measurements and sorting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Ordering used by the table view.
    ///
    /// Integers and floats compare by value so a column mixing `0` and `8.5`
    /// sorts numerically; dates compare chronologically when they parse.
    /// Nulls sort first.
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        use CellValue::*;
        fn rank(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Integer(_) | Float(_) => 1,
                Date(_) => 2,
                String(_) => 3,
            }
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Integer(_) | Float(_), Integer(_) | Float(_)) => {
                let a = self.as_f64().unwrap_or(f64::NAN);
                let b = other.as_f64().unwrap_or(f64::NAN);
                a.total_cmp(&b)
            }
            (Date(a), Date(b)) => match (parse_date(a), parse_date(b)) {
                (Some(da), Some(db)) => da.cmp(&db),
                _ => a.cmp(b),
            },
            (String(a), String(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) | CellValue::Date(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            // Debug keeps the trailing `.0` on integral floats.
            CellValue::Float(v) => write!(f, "{v:?}"),
            CellValue::Null => Ok(()),
        }
    }
}

/// Parse the date formats found in tracker exports (`4/12/2016`, `2016-04-12`).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];
    let s = s.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

// ---------------------------------------------------------------------------
// Measurement – the fixed numeric columns the charts read
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Measurement {
    TotalSteps,
    TotalDistance,
    Calories,
    VeryActiveMinutes,
    FairlyActiveMinutes,
    LightlyActiveMinutes,
}

impl Measurement {
    pub const ALL: [Measurement; 6] = [
        Measurement::TotalSteps,
        Measurement::TotalDistance,
        Measurement::Calories,
        Measurement::VeryActiveMinutes,
        Measurement::FairlyActiveMinutes,
        Measurement::LightlyActiveMinutes,
    ];

    /// Columns selectable in the histogram dropdown.
    pub const HISTOGRAM: [Measurement; 3] = [
        Measurement::TotalSteps,
        Measurement::TotalDistance,
        Measurement::Calories,
    ];

    /// Display name used as the column header after loading.
    pub fn column_name(self) -> &'static str {
        match self {
            Measurement::TotalSteps => "Total Steps",
            Measurement::TotalDistance => "Total Distance (in miles)",
            Measurement::Calories => "Calories Burned",
            Measurement::VeryActiveMinutes => "VeryActiveMinutes",
            Measurement::FairlyActiveMinutes => "FairlyActiveMinutes",
            Measurement::LightlyActiveMinutes => "LightlyActiveMinutes",
        }
    }

    /// Header used by the raw tracker export.
    pub fn source_name(self) -> &'static str {
        match self {
            Measurement::TotalSteps => "TotalSteps",
            Measurement::TotalDistance => "TotalDistance",
            Measurement::Calories => "Calories",
            other => other.column_name(),
        }
    }

    /// Resolve a histogram column from its display name.
    pub fn from_histogram_name(name: &str) -> Option<Measurement> {
        Measurement::HISTOGRAM
            .into_iter()
            .find(|m| m.column_name() == name)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

pub const ID_COLUMN: &str = "Id";
pub const DATE_COLUMN: &str = "ActivityDate";

/// Map a source header to the name shown in the table and export.
pub fn rename_header(header: &str) -> String {
    Measurement::ALL
        .into_iter()
        .find(|m| m.source_name() == header)
        .map(|m| m.column_name().to_string())
        .unwrap_or_else(|| header.to_string())
}

// ---------------------------------------------------------------------------
// Record – one row of the activity table
// ---------------------------------------------------------------------------

/// One day of tracker activity for one identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: i64,
    pub activity_date: NaiveDate,
    pub total_steps: f64,
    pub total_distance: f64,
    pub calories: f64,
    pub very_active_minutes: f64,
    pub fairly_active_minutes: f64,
    pub lightly_active_minutes: f64,
    /// Every cell of the source row, in `FitnessDataset::columns` order.
    pub cells: Vec<CellValue>,
}

impl Record {
    pub fn value(&self, measurement: Measurement) -> f64 {
        match measurement {
            Measurement::TotalSteps => self.total_steps,
            Measurement::TotalDistance => self.total_distance,
            Measurement::Calories => self.calories,
            Measurement::VeryActiveMinutes => self.very_active_minutes,
            Measurement::FairlyActiveMinutes => self.fairly_active_minutes,
            Measurement::LightlyActiveMinutes => self.lightly_active_minutes,
        }
    }
}

// ---------------------------------------------------------------------------
// FitnessDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with one cohort label per record.
#[derive(Debug, Clone)]
pub struct FitnessDataset {
    /// Column headers after renaming, in source order.
    pub columns: Vec<String>,
    /// All records in source row order.
    pub records: Vec<Record>,
    /// `cohorts[i]` labels `records[i]`.
    pub cohorts: Vec<Cohort>,
}

impl FitnessDataset {
    /// Label the loaded records and build the dataset.
    pub fn from_records(columns: Vec<String>, records: Vec<Record>) -> Self {
        let cohorts = assign_cohorts(&records);
        FitnessDataset {
            columns,
            records,
            cohorts,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of distinct identifiers.
    pub fn identifier_count(&self) -> usize {
        let mut ids: Vec<i64> = self.records.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2016, 4, 12);
        assert_eq!(parse_date("4/12/2016"), expected);
        assert_eq!(parse_date("2016-04-12"), expected);
        assert_eq!(parse_date("12th April"), None);
    }

    #[test]
    fn numeric_cells_sort_by_value() {
        let a = CellValue::Integer(3);
        let b = CellValue::Float(2.5);
        assert_eq!(a.sort_cmp(&b), Ordering::Greater);
        assert_eq!(CellValue::Null.sort_cmp(&b), Ordering::Less);
    }

    #[test]
    fn date_cells_sort_chronologically() {
        let early = CellValue::Date("4/9/2016".into());
        let late = CellValue::Date("4/12/2016".into());
        assert_eq!(early.sort_cmp(&late), Ordering::Less);
    }

    #[test]
    fn headline_columns_are_renamed() {
        assert_eq!(rename_header("TotalSteps"), "Total Steps");
        assert_eq!(rename_header("Calories"), "Calories Burned");
        assert_eq!(rename_header("SedentaryMinutes"), "SedentaryMinutes");
        assert_eq!(rename_header("Total Steps"), "Total Steps");
    }

    #[test]
    fn float_cells_keep_decimal_point() {
        assert_eq!(CellValue::Float(2.0).to_string(), "2.0");
        assert_eq!(CellValue::Float(8.5).to_string(), "8.5");
        assert_eq!(CellValue::Null.to_string(), "");
    }

    #[test]
    fn dataset_without_records_is_empty() {
        let ds = FitnessDataset::from_records(vec![ID_COLUMN.to_string()], Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.identifier_count(), 0);
        assert!(ds.cohorts.is_empty());
    }
}
