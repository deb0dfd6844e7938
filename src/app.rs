use eframe::egui;

use crate::config::EditorConfig;
use crate::state::AppState;
use crate::ui::{layers, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DisperModelApp {
    pub state: AppState,
}

impl DisperModelApp {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl Default for DisperModelApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for DisperModelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls and readouts ----
        egui::SidePanel::left("control_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: dispersion plot | layer plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                plot::dispersion_plot(&mut columns[0], &mut self.state);
                layers::layer_plot(&mut columns[1], &mut self.state);
            });
        });
    }
}
