mod analysis;
mod app;
mod classifier;
mod color;
mod config;
mod data;
mod heatmap;
mod state;
mod ui;

use app::FireWardenApp;
use eframe::egui;

fn main() -> eframe::Result {
    // The logger is built explicitly before any component runs; RUST_LOG
    // overrides the default level.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 840.0])
            .with_min_inner_size([700.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Fire Warden – Station Siting",
        options,
        Box::new(|_cc| Ok(Box::new(FireWardenApp::bootstrap()))),
    )
}
