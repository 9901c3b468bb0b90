use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::color::{hue_color, hue_of};
use crate::data::filter::{LAT_BOUNDS, LON_BOUNDS};
use crate::export;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            genus_section(ui, state);
            ui.separator();
            neighbourhood_section(ui, state);
            ui.separator();
            range_section(ui, state);
            ui.separator();

            if state.profile.has_hue_picker() {
                hue_picker(ui, state);
                ui.separator();
            }

            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });

    // Recompute the result set after any widget changes.
    state.refilter();
}

fn genus_section(ui: &mut Ui, state: &mut AppState) {
    let all_genera = state.dataset.genera.clone();
    let n_selected = state.spec.genera.len();
    let n_total = all_genera.len();
    let header_text = format!("Genus  ({n_selected}/{n_total})");

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt("genus_filter")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_genera();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_genera();
                }
            });

            for genus in &all_genera {
                let text =
                    RichText::new(genus.as_str()).color(state.colors.color_for(genus));
                let mut checked = state.spec.genera.contains(genus);
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_genus(genus);
                }
            }
        });
}

fn neighbourhood_section(ui: &mut Ui, state: &mut AppState) {
    ui.checkbox(&mut state.spec.neighbourhood_enabled, "Filter by neighbourhood");

    let current = state.spec.neighbourhood.clone().unwrap_or_default();
    ui.add_enabled_ui(state.spec.neighbourhood_enabled, |ui: &mut Ui| {
        egui::ComboBox::from_id_salt("neighbourhood")
            .selected_text(&current)
            .show_ui(ui, |ui: &mut Ui| {
                for hood in &state.dataset.neighbourhoods.clone() {
                    if ui.selectable_label(current == *hood, hood).clicked() {
                        state.spec.neighbourhood = Some(hood.clone());
                    }
                }
            });
    });
}

fn range_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Latitude");
    ui.add(
        Slider::new(&mut state.spec.latitude_range.0, LAT_BOUNDS.0..=LAT_BOUNDS.1)
            .text("min")
            .fixed_decimals(4),
    );
    ui.add(
        Slider::new(&mut state.spec.latitude_range.1, LAT_BOUNDS.0..=LAT_BOUNDS.1)
            .text("max")
            .fixed_decimals(4),
    );

    ui.strong("Longitude");
    ui.add(
        Slider::new(&mut state.spec.longitude_range.0, LON_BOUNDS.0..=LON_BOUNDS.1)
            .text("min")
            .fixed_decimals(4),
    );
    ui.add(
        Slider::new(&mut state.spec.longitude_range.1, LON_BOUNDS.0..=LON_BOUNDS.1)
            .text("max")
            .fixed_decimals(4),
    );
}

fn hue_picker(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Palette hue");
    let mut swatch = hue_color(state.base_hue);
    if egui::color_picker::color_edit_button_srgba(
        ui,
        &mut swatch,
        egui::color_picker::Alpha::Opaque,
    )
    .changed()
    {
        state.set_base_hue(hue_of(swatch));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export table as CSV…").clicked() {
                export_csv(state);
                ui.close_menu();
            }
            if ui.button("Export chart as PNG…").clicked() {
                export_png(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} trees, {} matching",
            state.dataset.len(),
            state.results.len()
        ));

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Export dialogs
// ---------------------------------------------------------------------------

fn export_csv(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered table")
        .set_file_name(export::CSV_FILENAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match export::save_results_csv(&state.dataset, &state.results, &path) {
            Ok(()) => {
                log::info!("exported {} rows to {}", state.results.len(), path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("CSV export failed: {e}");
                state.status_message = Some(format!("Export failed: {e}"));
            }
        }
    }
}

fn export_png(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export chart")
        .set_file_name(export::PNG_FILENAME)
        .add_filter("PNG", &["png"])
        .save_file();

    if let Some(path) = file {
        match export::save_chart_png(&state.counts, &state.colors, &path) {
            Ok(()) => {
                log::info!("exported chart to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("PNG export failed: {e}");
                state.status_message = Some(format!("Export failed: {e}"));
            }
        }
    }
}
