#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod config;
mod io;
mod layout;
mod model;
mod state;
mod ui;

use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = config::Settings::load_or_default();
    tracing::info!(api = %settings.api_base_url, "starting task overview");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1440.0, 800.0])
            .with_min_inner_size([960.0, 480.0])
            .with_title("Task Overview"),
        ..Default::default()
    };

    eframe::run_native(
        "Task Overview",
        options,
        Box::new(|cc| Ok(Box::new(app::OverviewApp::new(cc, settings)?))),
    )
}
