mod app;
mod charts;
mod color;
mod config;
mod dashboard;
mod data;
mod error;
mod export;
mod router;
mod state;
mod ui;

use anyhow::{anyhow, Context, Result};
use app::FitnessDashApp;
use clap::Parser;
use config::{parse_chart_request, Cli};
use dashboard::Dashboard;
use eframe::egui;
use router::SelectionRouter;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // A dataset that fails to load is fatal: no window opens.
    let dashboard = Dashboard::load(&cli.data)
        .with_context(|| format!("loading {}", cli.data.display()))?;
    if dashboard.dataset.is_empty() {
        log::warn!("{} contains no activity records", cli.data.display());
    }

    if let Some(path) = &cli.export {
        let blob = export::export_csv(dashboard.table())?;
        ui::panels::write_blob(path, &blob.content)?;
        log::info!("Exported {} rows to {}", dashboard.table().len(), path.display());
        return Ok(());
    }

    if let Some(request) = &cli.chart {
        let (control, value) = parse_chart_request(request)?;
        let spec = SelectionRouter::default().dispatch(&dashboard, control, &value)?;
        let json = if cli.pretty {
            serde_json::to_string_pretty(&spec)?
        } else {
            serde_json::to_string(&spec)?
        };
        println!("{json}");
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([cli.width, cli.height])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Fitbit Analytics Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(FitnessDashApp::new(dashboard)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
