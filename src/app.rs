use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{charts, docs, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MethaneTrackerApp {
    pub state: AppState,
}

impl MethaneTrackerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for MethaneTrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.tab {
            Tab::Emission => docs::emission_tab(ui, &self.state.assets.emission),
            Tab::Glossary => docs::glossary_tab(ui, &self.state.assets.glossary),
            Tab::Dashboard => charts::dashboard(ui, &self.state),
        });
    }
}
