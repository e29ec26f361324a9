//! Chart builders: pure functions from the loaded data to a [`ChartSpec`].
//!
//! A spec describes series, axes and encodings only; the `ui` module draws
//! it and `--chart` prints it as JSON.

use chrono::NaiveDate;
use serde::Serialize;

use crate::color::Rgb;
use crate::data::cohort::Cohort;

pub mod bubble;
pub mod histogram;
pub mod line;
pub mod pie;

// ---------------------------------------------------------------------------
// Chart description
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    #[serde(flatten)]
    pub body: ChartBody,
    /// Animated transition between successive specs, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axis {
    pub label: String,
    /// Fixed `[min, max]`; `None` lets the renderer fit the data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
}

impl Axis {
    pub fn new(label: impl Into<String>) -> Self {
        Axis {
            label: label.into(),
            range: None,
        }
    }

    pub fn fixed(label: impl Into<String>, min: f64, max: f64) -> Self {
        Axis {
            label: label.into(),
            range: Some([min, max]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartBody {
    Line { series: Vec<LineSeries> },
    Histogram { column: String, bins: Vec<HistogramBin> },
    Pie { slices: Vec<PieSlice> },
    Bubble { size_max: f64, frames: Vec<BubbleFrame> },
    Placeholder { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub color: Rgb,
    pub points: Vec<LinePoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// `[lower, upper)`; the last bin of a histogram also includes `upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    /// Summed minutes behind the slice.
    pub minutes: f64,
    pub percent: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleFrame {
    pub date: NaiveDate,
    pub points: Vec<BubblePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubblePoint {
    pub id: i64,
    pub x: f64,
    pub y: f64,
    /// Marker diameter in pixels.
    pub size: f64,
    pub color: Rgb,
    pub cohort: Cohort,
}

impl ChartSpec {
    /// Spec shown in place of a chart that could not be built.
    pub fn placeholder(title: impl Into<String>, message: impl Into<String>) -> Self {
        ChartSpec {
            title: title.into(),
            x_axis: Axis::default(),
            y_axis: Axis::default(),
            body: ChartBody::Placeholder {
                message: message.into(),
            },
            transition_ms: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.body, ChartBody::Placeholder { .. })
    }
}
