use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SaudeDashApp {
    pub state: AppState,
}

impl Default for SaudeDashApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for SaudeDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tabbed dashboard ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui: &mut egui::Ui| {
                    ui.heading("Open a spreadsheet export to start the analysis  (File → Open…)");
                });
                return;
            }

            ui.horizontal(|ui: &mut egui::Ui| {
                for tab in Tab::ALL {
                    if ui
                        .selectable_label(self.state.active_tab == tab, tab.label())
                        .clicked()
                    {
                        self.state.active_tab = tab;
                    }
                }
            });
            ui.separator();

            match self.state.active_tab {
                Tab::Overview => charts::overview_tab(ui, &self.state),
                Tab::Health => charts::health_tab(ui, &self.state),
                Tab::EducationEconomy => charts::education_economy_tab(ui, &self.state),
                Tab::Table => table::table_tab(ui, &mut self.state),
            }
        });
    }
}
