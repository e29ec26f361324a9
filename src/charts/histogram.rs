use super::{Axis, ChartBody, ChartSpec, HistogramBin};
use crate::data::model::{FitnessDataset, Measurement};
use crate::error::ChartError;

/// Frequency distribution of one headline column across the whole table.
///
/// `column` must be one of the display names in [`Measurement::HISTOGRAM`].
pub fn build(dataset: &FitnessDataset, column: &str) -> Result<ChartSpec, ChartError> {
    let measurement = Measurement::from_histogram_name(column)
        .ok_or_else(|| ChartError::UnknownColumn(column.to_string()))?;

    let values: Vec<f64> = dataset.records.iter().map(|r| r.value(measurement)).collect();

    Ok(ChartSpec {
        title: format!("Histogram of {column}"),
        x_axis: Axis::new(column),
        y_axis: Axis::new("count"),
        body: ChartBody::Histogram {
            column: column.to_string(),
            bins: bin_values(&values),
        },
        transition_ms: None,
    })
}

/// Equal-width bins, count chosen by Sturges' rule.
fn bin_values(values: &[f64]) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Vec::new();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if (max - min).abs() < f64::EPSILON {
        return vec![HistogramBin {
            lower: min - 0.5,
            upper: min + 0.5,
            count: finite.len(),
        }];
    }

    let n_bins = sturges(finite.len());
    let width = (max - min) / n_bins as f64;
    let mut bins: Vec<HistogramBin> = (0..n_bins)
        .map(|i| HistogramBin {
            lower: min + i as f64 * width,
            upper: if i + 1 == n_bins {
                max
            } else {
                min + (i + 1) as f64 * width
            },
            count: 0,
        })
        .collect();

    for v in finite {
        let idx = (((v - min) / width).floor() as usize).min(n_bins - 1);
        bins[idx].count += 1;
    }
    bins
}

fn sturges(n: usize) -> usize {
    (n as f64).log2().ceil() as usize + 1
}
