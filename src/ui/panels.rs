use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, Ui};

use crate::charts::pie::PieTarget;
use crate::data::cohort::Cohort;
use crate::data::model::Measurement;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Fitbit Analytics");
    ui.label(
        "Workout trends for one personal tracker compared with thirty other \
         Fitbit users.",
    );
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Cohort → line chart ----
            ui.strong("Cohort");
            for cohort in Cohort::SELECTOR_OPTIONS {
                if ui
                    .radio(state.cohort == cohort, cohort.label())
                    .clicked()
                    && state.cohort != cohort
                {
                    state.select_cohort(cohort);
                }
            }
            ui.separator();

            // ---- Column → histogram ----
            ui.strong("Histogram column");
            let current = state.column;
            egui::ComboBox::from_id_salt("histogram_column")
                .selected_text(current.column_name())
                .show_ui(ui, |ui: &mut Ui| {
                    for m in Measurement::HISTOGRAM {
                        if ui
                            .selectable_label(current == m, m.column_name())
                            .clicked()
                            && current != m
                        {
                            state.select_column(m);
                        }
                    }
                });
            ui.separator();

            // ---- Pie target ----
            ui.strong("Workout minutes");
            for target in PieTarget::ALL {
                if ui
                    .radio(state.pie_target == target, target.label())
                    .clicked()
                    && state.pie_target != target
                {
                    state.select_pie_target(target);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export CSV…").clicked() {
                save_export_dialog(state);
                ui.close_menu();
            }
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        let ds = &state.dashboard.dataset;
        ui.label(format!(
            "{} records, {} identifiers",
            ds.len(),
            ds.identifier_count()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Ask for a destination and write the export blob there.
pub fn save_export_dialog(state: &mut AppState) {
    let blob = match state.export_blob() {
        Ok(blob) => blob,
        Err(e) => {
            log::error!("Failed to build export: {e}");
            state.status_message = Some(format!("Error: {e}"));
            return;
        }
    };

    let file = rfd::FileDialog::new()
        .set_title("Save table as CSV")
        .set_file_name(blob.filename)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match write_blob(&path, &blob.content) {
            Ok(()) => {
                log::info!("Exported {} bytes to {}", blob.content.len(), path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn write_blob(path: &std::path::Path, content: &[u8]) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))
}
