use std::time::Duration;

use eframe::egui::{self, Ui};

use crate::dashboard::Dashboard;
use crate::state::{AppState, FRAME_INTERVAL_SECS};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FitnessDashApp {
    pub state: AppState,
}

impl FitnessDashApp {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            state: AppState::new(dashboard),
        }
    }
}

impl eframe::App for FitnessDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);
        self.state.advance_animation(now);
        if self.state.animation.playing {
            ctx.request_repaint_after(Duration::from_secs_f64(FRAME_INTERVAL_SECS / 4.0));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls ----
        egui::SidePanel::left("control_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts + table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    dashboard_grid(ui, &mut self.state);
                });
        });
    }
}

fn dashboard_grid(ui: &mut Ui, state: &mut AppState) {
    ui.columns(2, |cols| {
        plot::chart(&mut cols[0], "line_plot", &state.line_chart, 0);
        plot::chart(&mut cols[1], "histogram", &state.histogram, 0);
    });
    ui.separator();

    ui.columns(2, |cols| {
        plot::chart(&mut cols[0], "pie_chart", &state.pie_chart, 0);
        bubble_with_controls(&mut cols[1], state);
    });
    ui.separator();

    ui.strong("Records");
    table::data_table(ui, state);
}

fn bubble_with_controls(ui: &mut Ui, state: &mut AppState) {
    plot::chart(ui, "bubble_chart", &state.bubble_chart, state.animation.frame);

    let n_frames = state.frame_count();
    if n_frames == 0 {
        return;
    }
    ui.horizontal(|ui: &mut Ui| {
        let label = if state.animation.playing { "⏸" } else { "▶" };
        if ui.button(label).clicked() {
            state.toggle_playback();
        }
        let mut frame = state.animation.frame;
        if ui
            .add(egui::Slider::new(&mut frame, 0..=n_frames - 1).show_value(false))
            .changed()
        {
            state.animation.frame = frame;
            state.animation.playing = false;
        }
        if let crate::charts::ChartBody::Bubble { frames, .. } = &state.bubble_chart.body {
            if let Some(f) = frames.get(state.animation.frame) {
                ui.label(f.date.format("%Y-%m-%d").to_string());
            }
        }
    });
}
