use eframe::egui;

use crate::state::AppState;
use crate::ui::{map, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FireWardenApp {
    pub state: AppState,
}

impl FireWardenApp {
    /// Run the data → features → model pipeline once and hand the result
    /// to the UI.
    pub fn bootstrap() -> Self {
        Self {
            state: AppState::bootstrap(),
        }
    }
}

impl eframe::App for FireWardenApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu and status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: query parameters and results ----
        egui::SidePanel::left("query_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: hotspot map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            map::map_panel(ui, &mut self.state);
        });
    }
}
