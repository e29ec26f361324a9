use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{Axis, BubbleFrame, BubblePoint, ChartBody, ChartSpec};
use crate::color::ColorMap;
use crate::data::model::{FitnessDataset, Measurement};

const TITLE: &str = "Daily Steps vs Distance";
/// Diameter of the largest marker, in pixels.
pub const SIZE_MAX: f64 = 55.0;
const X_RANGE: [f64; 2] = [0.0, 6000.0];
const Y_RANGE: [f64; 2] = [0.0, 10.0];

const X: Measurement = Measurement::TotalSteps;
const Y: Measurement = Measurement::TotalDistance;
const SIZE: Measurement = Measurement::VeryActiveMinutes;

/// Animated scatter of every record, one frame per activity date.
///
/// Marker area is proportional to `VeryActiveMinutes`, scaled so the largest
/// value over the whole table gets [`SIZE_MAX`]. Colour follows the identifier.
pub fn build(dataset: &FitnessDataset) -> ChartSpec {
    let colors = ColorMap::new(dataset.records.iter().map(|r| r.id));
    let size_ref = dataset
        .records
        .iter()
        .map(|r| r.value(SIZE))
        .fold(0.0f64, f64::max);

    let mut frames: BTreeMap<NaiveDate, Vec<BubblePoint>> = BTreeMap::new();
    for (record, cohort) in dataset.records.iter().zip(&dataset.cohorts) {
        let size = if size_ref > 0.0 {
            SIZE_MAX * (record.value(SIZE).max(0.0) / size_ref).sqrt()
        } else {
            0.0
        };
        frames
            .entry(record.activity_date)
            .or_default()
            .push(BubblePoint {
                id: record.id,
                x: record.value(X),
                y: record.value(Y),
                size,
                color: colors.color_for(record.id),
                cohort: *cohort,
            });
    }

    let frames = frames
        .into_iter()
        .map(|(date, points)| BubbleFrame { date, points })
        .collect();

    ChartSpec {
        title: TITLE.to_string(),
        x_axis: Axis::fixed(X.column_name(), X_RANGE[0], X_RANGE[1]),
        y_axis: Axis::fixed(Y.column_name(), Y_RANGE[0], Y_RANGE[1]),
        body: ChartBody::Bubble {
            size_max: SIZE_MAX,
            frames,
        },
        transition_ms: None,
    }
}
