use eframe::egui;

use crate::data::model::TreeDataset;
use crate::profile::Profile;
use crate::state::{AppState, Tab};
use crate::ui::{chart, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ArborviewApp {
    pub state: AppState,
}

impl ArborviewApp {
    pub fn new(dataset: TreeDataset, profile: Profile) -> Self {
        Self {
            state: AppState::new(dataset, profile),
        }
    }
}

impl eframe::App for ArborviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar, counts, status ----
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

        if self.state.profile.tabbed() {
            // Classic: chart and table as tabs in the central panel.
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.horizontal(|ui| {
                    for (tab, label) in [(Tab::Chart, "Chart"), (Tab::Table, "Table")] {
                        if ui.selectable_label(self.state.tab == tab, label).clicked() {
                            self.state.tab = tab;
                        }
                    }
                });
                ui.separator();
                match self.state.tab {
                    Tab::Chart => chart::histogram(ui, &self.state),
                    Tab::Table => table::results_table(ui, &mut self.state),
                }
            });
        } else {
            // Noir: chart above, table below.
            egui::TopBottomPanel::bottom("table_panel")
                .default_height(260.0)
                .resizable(true)
                .show(ctx, |ui| {
                    table::results_table(ui, &mut self.state);
                });
            egui::CentralPanel::default().show(ctx, |ui| {
                chart::histogram(ui, &self.state);
            });
        }
    }
}
