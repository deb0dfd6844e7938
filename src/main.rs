mod app;
mod color;
mod config;
mod data;
mod editor;
mod error;
mod matcher;
mod solver;
mod state;
mod ui;
mod view;

use app::DisperModelApp;
use config::EditorConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = EditorConfig::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Disper Model – Layered Velocity Editor",
        options,
        Box::new(move |_cc| Ok(Box::new(DisperModelApp::new(&config)))),
    )
}
