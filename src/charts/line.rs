use std::collections::BTreeMap;

use super::{Axis, ChartBody, ChartSpec, LinePoint, LineSeries};
use crate::color::generate_palette;
use crate::data::model::{FitnessDataset, Measurement, DATE_COLUMN};

const TITLE: &str = "Line Plot";
const TRANSITION_MS: u64 = 500;
const MEASUREMENT: Measurement = Measurement::VeryActiveMinutes;

/// One `VeryActiveMinutes`-over-time line per identifier among `indices`.
///
/// Series appear in first-appearance order of their identifier; points are
/// sorted by date. No indices → a spec with no series.
pub fn build(dataset: &FitnessDataset, indices: &[usize]) -> ChartSpec {
    let mut order: Vec<i64> = Vec::new();
    let mut points: BTreeMap<i64, Vec<LinePoint>> = BTreeMap::new();

    for &idx in indices {
        let record = &dataset.records[idx];
        let entry = points.entry(record.id).or_insert_with(|| {
            order.push(record.id);
            Vec::new()
        });
        entry.push(LinePoint {
            date: record.activity_date,
            value: record.value(MEASUREMENT),
        });
    }

    let palette = generate_palette(order.len());
    let series = order
        .into_iter()
        .zip(palette)
        .map(|(id, color)| {
            let mut pts = points.remove(&id).unwrap_or_default();
            pts.sort_by_key(|p| p.date);
            LineSeries {
                name: id.to_string(),
                color,
                points: pts,
            }
        })
        .collect();

    ChartSpec {
        title: TITLE.to_string(),
        x_axis: Axis::new(DATE_COLUMN),
        y_axis: Axis::new(MEASUREMENT.column_name()),
        body: ChartBody::Line { series },
        transition_ms: Some(TRANSITION_MS),
    }
}
