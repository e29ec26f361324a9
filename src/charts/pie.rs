use std::fmt;
use std::str::FromStr;

use super::{Axis, ChartBody, ChartSpec, PieSlice};
use crate::color::generate_palette;
use crate::data::model::{FitnessDataset, Measurement};

/// Intensity categories in slice order.
const CATEGORIES: [(&str, Measurement); 3] = [
    ("Very Active", Measurement::VeryActiveMinutes),
    ("Lightly Active", Measurement::LightlyActiveMinutes),
    ("Fairly Active", Measurement::FairlyActiveMinutes),
];

/// Which subset the pie summarizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PieTarget {
    /// Every record outside the personal cohort.
    Fitbit,
    /// The personal cohort.
    Personal,
}

impl PieTarget {
    pub const ALL: [PieTarget; 2] = [PieTarget::Fitbit, PieTarget::Personal];

    /// Value carried by the toggle control.
    pub fn value(self) -> &'static str {
        match self {
            PieTarget::Fitbit => "fitbit",
            PieTarget::Personal => "personal",
        }
    }

    /// Text shown next to the toggle.
    pub fn label(self) -> &'static str {
        match self {
            PieTarget::Fitbit => "Fitbit Users",
            PieTarget::Personal => "My Personal Data",
        }
    }

    fn title(self) -> String {
        format!("Distribution of Workout Minutes for {}", self.label())
    }
}

impl fmt::Display for PieTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for PieTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PieTarget::ALL
            .into_iter()
            .find(|t| t.value() == s)
            .ok_or_else(|| format!("not a pie target: {s}"))
    }
}

/// Share of very/lightly/fairly active minutes over `indices`.
pub fn build(dataset: &FitnessDataset, indices: &[usize], target: PieTarget) -> ChartSpec {
    let mut minutes = [0.0f64; 3];
    for &idx in indices {
        let record = &dataset.records[idx];
        for (sum, (_, m)) in minutes.iter_mut().zip(CATEGORIES) {
            *sum += record.value(m);
        }
    }

    let percents = normalize(minutes);
    let slices = CATEGORIES
        .into_iter()
        .zip(minutes)
        .zip(percents)
        .zip(generate_palette(CATEGORIES.len()))
        .map(|((((label, _), minutes), percent), color)| PieSlice {
            label: label.to_string(),
            minutes,
            percent,
            color,
        })
        .collect();

    ChartSpec {
        title: target.title(),
        x_axis: Axis::default(),
        y_axis: Axis::default(),
        body: ChartBody::Pie { slices },
        transition_ms: None,
    }
}

/// Scale to percentages summing to 100; an all-zero total stays all zero.
pub fn normalize(minutes: [f64; 3]) -> [f64; 3] {
    let total: f64 = minutes.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return [0.0; 3];
    }
    minutes.map(|m| m / total * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;
    use chrono::NaiveDate;

    fn record(very: f64, lightly: f64, fairly: f64) -> Record {
        Record {
            id: 1,
            activity_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            total_steps: 0.0,
            total_distance: 0.0,
            calories: 0.0,
            very_active_minutes: very,
            fairly_active_minutes: fairly,
            lightly_active_minutes: lightly,
            cells: Vec::new(),
        }
    }

    fn percents(spec: &ChartSpec) -> Vec<f64> {
        match &spec.body {
            ChartBody::Pie { slices } => slices.iter().map(|s| s.percent).collect(),
            other => panic!("expected pie, got {other:?}"),
        }
    }

    #[test]
    fn personal_sums_normalize_to_percentages() {
        let ds = FitnessDataset::from_records(
            Vec::new(),
            vec![record(10.0, 40.0, 5.0), record(20.0, 20.0, 5.0)],
        );
        let spec = build(&ds, &[0, 1], PieTarget::Personal);

        let p = percents(&spec);
        assert!((p[0] - 30.0).abs() < 1e-9);
        assert!((p[1] - 60.0).abs() < 1e-9);
        assert!((p[2] - 10.0).abs() < 1e-9);
        assert_eq!(
            spec.title,
            "Distribution of Workout Minutes for My Personal Data"
        );
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        for minutes in [[1.0, 2.0, 3.0], [17.0, 0.0, 0.5], [1e6, 3.0, 7.0]] {
            let total: f64 = normalize(minutes).iter().sum();
            assert!((total - 100.0).abs() < 1e-9, "{minutes:?}");
        }
    }

    #[test]
    fn zero_minutes_give_zero_percentages() {
        let ds = FitnessDataset::from_records(Vec::new(), vec![record(0.0, 0.0, 0.0)]);
        assert_eq!(percents(&build(&ds, &[0], PieTarget::Fitbit)), vec![0.0; 3]);
        assert_eq!(percents(&build(&ds, &[], PieTarget::Fitbit)), vec![0.0; 3]);
    }

    #[test]
    fn targets_parse_from_toggle_values() {
        assert_eq!("fitbit".parse::<PieTarget>(), Ok(PieTarget::Fitbit));
        assert_eq!("personal".parse::<PieTarget>(), Ok(PieTarget::Personal));
        assert!("everyone".parse::<PieTarget>().is_err());
    }
}
