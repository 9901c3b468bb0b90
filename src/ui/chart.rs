use std::collections::BTreeMap;

use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::data::aggregate::by_genus;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Year/genus histogram (central panel)
// ---------------------------------------------------------------------------

/// Render the stacked year/genus histogram.
///
/// One bar per planting year, one stacked segment per genus, colours
/// from the shared genus map. Blank result sets draw an empty plot.
pub fn histogram(ui: &mut Ui, state: &AppState) {
    let series = by_genus(&state.counts);

    Plot::new("year_genus_histogram")
        .legend(Legend::default())
        .x_axis_label("Planting year")
        .y_axis_label("Trees planted")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            // Per-year running offset so each genus stacks on the last.
            let mut stacked: BTreeMap<i32, f64> = BTreeMap::new();

            for (genus, per_year) in &series {
                let color = state.colors.color_for(genus);

                let bars: Vec<Bar> = per_year
                    .iter()
                    .map(|(&year, &n)| {
                        let base = stacked.entry(year).or_insert(0.0);
                        let bar = Bar::new(year as f64, n as f64)
                            .base_offset(*base)
                            .width(0.8)
                            .fill(color)
                            .name(genus);
                        *base += n as f64;
                        bar
                    })
                    .collect();

                plot_ui.bar_chart(BarChart::new(bars).name(genus).color(color));
            }
        });
}
