use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::table::SortDirection;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Data table – sortable, paginated
// ---------------------------------------------------------------------------

/// Render the current page of the unlabeled table plus pager and download.
pub fn data_table(ui: &mut Ui, state: &mut AppState) {
    let columns = state.table_view.display_columns.clone();
    let sort = state.table_view.sort;
    let mut clicked_header: Option<usize> = None;

    if state.dashboard.table().is_empty() {
        ui.label(egui::RichText::new("No records loaded.").italics());
    }

    egui::ScrollArea::horizontal()
        .id_salt("data_table_scroll")
        .show(ui, |ui: &mut Ui| {
            let table = state.dashboard.table();
            let mut builder = TableBuilder::new(ui).striped(true).vscroll(false);
            for _ in &columns {
                builder = builder.column(Column::auto().resizable(true));
            }

            builder
                .header(ROW_HEIGHT + 4.0, |mut header| {
                    for &col in &columns {
                        header.col(|ui: &mut Ui| {
                            let arrow = match sort {
                                Some((c, SortDirection::Ascending)) if c == col => " ▲",
                                Some((c, SortDirection::Descending)) if c == col => " ▼",
                                _ => "",
                            };
                            let text = format!("{}{arrow}", table.columns[col]);
                            if ui.button(egui::RichText::new(text).strong()).clicked() {
                                clicked_header = Some(col);
                            }
                        });
                    }
                })
                .body(|mut body| {
                    for &row_idx in state.table_view.page_rows() {
                        let row = &table.rows[row_idx];
                        body.row(ROW_HEIGHT, |mut table_row| {
                            for &col in &columns {
                                table_row.col(|ui: &mut Ui| {
                                    ui.label(row[col].to_string());
                                });
                            }
                        });
                    }
                });
        });

    if let Some(col) = clicked_header {
        state.toggle_sort(col);
    }

    ui.horizontal(|ui: &mut Ui| {
        let view = &mut state.table_view;
        if ui
            .add_enabled(view.page > 0, egui::Button::new("◀"))
            .clicked()
        {
            view.prev_page();
        }
        ui.label(format!("page {} / {}", view.page + 1, view.page_count()));
        if ui
            .add_enabled(view.page + 1 < view.page_count(), egui::Button::new("▶"))
            .clicked()
        {
            view.next_page();
        }
    });

    ui.add_space(12.0);
    if ui.button("Download CSV").clicked() {
        super::panels::save_export_dialog(state);
    }
}
