use std::f64::consts::{FRAC_PI_2, TAU};

use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text,
};

use crate::charts::{
    BubbleFrame, ChartBody, ChartSpec, HistogramBin, LineSeries, PieSlice,
};
use crate::color::Rgb;

/// Height of every chart area.
pub const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Chart dispatch
// ---------------------------------------------------------------------------

/// Draw a chart spec. `frame` selects the bubble-chart frame and is ignored
/// by other kinds.
pub fn chart(ui: &mut Ui, id: &str, spec: &ChartSpec, frame: usize) {
    if spec.is_placeholder() {
        ui.label(RichText::new(&spec.title).strong().color(Color32::GRAY));
    } else {
        ui.strong(&spec.title);
    }
    match &spec.body {
        ChartBody::Line { series } => line_chart(ui, id, spec, series),
        ChartBody::Histogram { column, bins } => histogram(ui, id, spec, column, bins),
        ChartBody::Pie { slices } => pie_chart(ui, id, slices),
        ChartBody::Bubble { frames, .. } => match frames.get(frame) {
            Some(f) => bubble_chart(ui, id, spec, f),
            None => placeholder(ui, "No activity dates to animate."),
        },
        ChartBody::Placeholder { message } => placeholder(ui, message),
    }
}

fn placeholder(ui: &mut Ui, message: &str) {
    ui.allocate_ui(
        eframe::egui::vec2(ui.available_width(), CHART_HEIGHT),
        |ui: &mut Ui| {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label(RichText::new(message).italics().color(Color32::GRAY));
            });
        },
    );
}

fn color32(rgb: Rgb) -> Color32 {
    let [r, g, b] = rgb.0;
    Color32::from_rgb(r, g, b)
}

/// Plot with the spec's axis labels and any fixed axis ranges applied.
fn base_plot(spec: &ChartSpec, id: String) -> Plot {
    let mut plot = Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(spec.x_axis.label.clone())
        .y_axis_label(spec.y_axis.label.clone());
    if let Some([lo, hi]) = spec.x_axis.range {
        plot = plot.include_x(lo).include_x(hi);
    }
    if let Some([lo, hi]) = spec.y_axis.range {
        plot = plot.include_y(lo).include_y(hi);
    }
    plot
}

// ---------------------------------------------------------------------------
// Line chart (dates on x)
// ---------------------------------------------------------------------------

fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn format_day(value: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(value.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn line_chart(ui: &mut Ui, id: &str, spec: &ChartSpec, series: &[LineSeries]) {
    if series.is_empty() {
        placeholder(ui, "No records in this cohort.");
        return;
    }
    base_plot(spec, id.to_owned())
        .legend(Legend::default())
        .x_axis_formatter(|mark, _range| format_day(mark.value))
        .label_formatter(|name, value| {
            format!("{name}\n{}\n{:.0} min", format_day(value.x), value.y)
        })
        .show(ui, |plot_ui| {
            for s in series {
                let points: PlotPoints = s
                    .points
                    .iter()
                    .map(|p| [day_number(p.date), p.value])
                    .collect();
                plot_ui.line(
                    Line::new(points)
                        .name(&s.name)
                        .color(color32(s.color))
                        .width(1.5),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

fn histogram(ui: &mut Ui, id: &str, spec: &ChartSpec, column: &str, bins: &[HistogramBin]) {
    if bins.is_empty() {
        placeholder(ui, "No values to count.");
        return;
    }
    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::new((b.lower + b.upper) / 2.0, b.count as f64)
                .width(b.upper - b.lower)
                .name(format!("{:.1} – {:.1}", b.lower, b.upper))
        })
        .collect();

    base_plot(spec, id.to_owned()).show(ui, |plot_ui| {
        plot_ui.bar_chart(
            BarChart::new(bars)
                .name(column)
                .color(Color32::from_rgb(99, 110, 250)),
        );
    });
}

// ---------------------------------------------------------------------------
// Pie chart (polygons on an equal-aspect plot)
// ---------------------------------------------------------------------------

/// Arc resolution: points per full turn.
const PIE_SEGMENTS: f64 = 96.0;

fn pie_chart(ui: &mut Ui, id: &str, slices: &[PieSlice]) {
    if slices.iter().all(|s| s.percent <= 0.0) {
        placeholder(ui, "No active minutes recorded.");
        return;
    }

    Plot::new(id.to_owned())
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            // Clockwise from twelve o'clock.
            let mut start = FRAC_PI_2;
            for slice in slices {
                let sweep = slice.percent / 100.0 * TAU;
                if sweep <= 0.0 {
                    continue;
                }
                let steps = ((sweep / TAU) * PIE_SEGMENTS).ceil().max(2.0) as usize;
                let mut outline = vec![[0.0, 0.0]];
                outline.extend((0..=steps).map(|i| {
                    let a = start - sweep * i as f64 / steps as f64;
                    [a.cos(), a.sin()]
                }));

                let name = format!("{} ({:.1}%)", slice.label, slice.percent);
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(outline))
                        .fill_color(color32(slice.color))
                        .stroke(Stroke::new(1.0, Color32::WHITE))
                        .name(&name),
                );

                let mid = start - sweep / 2.0;
                plot_ui.text(Text::new(
                    PlotPoint::new(0.6 * mid.cos(), 0.6 * mid.sin()),
                    RichText::new(format!("{:.1}%", slice.percent)).color(Color32::BLACK),
                ));
                start -= sweep;
            }
        });
}

// ---------------------------------------------------------------------------
// Bubble chart (one frame)
// ---------------------------------------------------------------------------

fn bubble_chart(ui: &mut Ui, id: &str, spec: &ChartSpec, frame: &BubbleFrame) {
    base_plot(spec, id.to_owned())
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .label_formatter(|name, value| {
            format!("{name}\nsteps {:.0}\ndistance {:.2}", value.x, value.y)
        })
        .show(ui, |plot_ui| {
            for p in &frame.points {
                plot_ui.points(
                    Points::new(vec![[p.x, p.y]])
                        .radius((p.size / 2.0).max(1.5) as f32)
                        .filled(true)
                        .color(color32(p.color).gamma_multiply(0.7))
                        .name(format!("{} – {}", p.id, p.cohort)),
                );
            }
        });
}
