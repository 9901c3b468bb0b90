use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::ResultSet;
use crate::data::model::TreeDataset;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Presentation-only table state
// ---------------------------------------------------------------------------

/// Sortable columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Genus,
    Species,
    Neighbourhood,
    Latitude,
    Longitude,
    Year,
}

impl SortColumn {
    pub const ALL: [SortColumn; 7] = [
        SortColumn::Id,
        SortColumn::Genus,
        SortColumn::Species,
        SortColumn::Neighbourhood,
        SortColumn::Latitude,
        SortColumn::Longitude,
        SortColumn::Year,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::Genus => "genus",
            SortColumn::Species => "species",
            SortColumn::Neighbourhood => "neighbourhood",
            SortColumn::Latitude => "latitude",
            SortColumn::Longitude => "longitude",
            SortColumn::Year => "year",
        }
    }
}

/// Sort and search state of the results table. Purely presentational:
/// it reorders and hides displayed rows but never feeds back into the
/// filter pipeline.
#[derive(Debug, Clone)]
pub struct TableView {
    pub sort: SortColumn,
    pub ascending: bool,
    pub search: String,
}

impl Default for TableView {
    fn default() -> Self {
        TableView {
            sort: SortColumn::Id,
            ascending: true,
            search: String::new(),
        }
    }
}

impl TableView {
    /// Toggle direction on the active column, or switch column ascending.
    pub fn click(&mut self, column: SortColumn) {
        if self.sort == column {
            self.ascending = !self.ascending;
        } else {
            self.sort = column;
            self.ascending = true;
        }
    }
}

/// Rows to display: the result set's indices, narrowed by the search
/// text (case-insensitive substring over genus/species/neighbourhood)
/// and reordered by the sort column.
pub fn visible_rows(dataset: &TreeDataset, results: &ResultSet, view: &TableView) -> Vec<usize> {
    let needle = view.search.trim().to_lowercase();
    let mut rows: Vec<usize> = results
        .indices()
        .iter()
        .copied()
        .filter(|&i| {
            if needle.is_empty() {
                return true;
            }
            let rec = &dataset.records[i];
            rec.genus.to_lowercase().contains(&needle)
                || rec.species.to_lowercase().contains(&needle)
                || rec.neighbourhood.to_lowercase().contains(&needle)
        })
        .collect();

    rows.sort_by(|&a, &b| {
        let (ra, rb) = (&dataset.records[a], &dataset.records[b]);
        let ord = match view.sort {
            SortColumn::Id => ra.id.cmp(&rb.id),
            SortColumn::Genus => ra.genus.cmp(&rb.genus),
            SortColumn::Species => ra.species.cmp(&rb.species),
            SortColumn::Neighbourhood => ra.neighbourhood.cmp(&rb.neighbourhood),
            SortColumn::Latitude => ra.latitude.total_cmp(&rb.latitude),
            SortColumn::Longitude => ra.longitude.total_cmp(&rb.longitude),
            SortColumn::Year => ra.year.cmp(&rb.year),
        };
        if view.ascending {
            ord
        } else {
            ord.reverse()
        }
    });
    rows
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the results table with search box and click-to-sort headers.
pub fn results_table(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Search:");
        ui.text_edit_singleline(&mut state.table.search);
    });
    ui.separator();

    if state.results.is_blank() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No matching records.");
        });
        return;
    }

    let rows = visible_rows(&state.dataset, &state.results, &state.table);
    let mut clicked: Option<SortColumn> = None;

    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().resizable(true), SortColumn::ALL.len())
        .header(20.0, |mut header| {
            for col in SortColumn::ALL {
                header.col(|ui| {
                    let marker = if state.table.sort == col {
                        if state.table.ascending {
                            " ▲"
                        } else {
                            " ▼"
                        }
                    } else {
                        ""
                    };
                    let text = format!("{}{marker}", col.label());
                    if ui.add(egui::Button::new(text).frame(false)).clicked() {
                        clicked = Some(col);
                    }
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let rec = &state.dataset.records[rows[row.index()]];
                row.col(|ui| {
                    ui.label(rec.id.to_string());
                });
                row.col(|ui| {
                    ui.label(&rec.genus);
                });
                row.col(|ui| {
                    ui.label(&rec.species);
                });
                row.col(|ui| {
                    ui.label(&rec.neighbourhood);
                });
                row.col(|ui| {
                    ui.label(format!("{:.4}", rec.latitude));
                });
                row.col(|ui| {
                    ui.label(format!("{:.4}", rec.longitude));
                });
                row.col(|ui| {
                    ui.label(rec.year.to_string());
                });
            });
        });

    if let Some(col) = clicked {
        state.table.click(col);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::TreeRecord;

    fn fixture() -> TreeDataset {
        let rec = |id, genus: &str, hood: &str, lat: f64, year| TreeRecord {
            id,
            genus: genus.to_string(),
            species: "X".to_string(),
            neighbourhood: hood.to_string(),
            latitude: lat,
            longitude: -123.1,
            year,
        };
        TreeDataset::from_records(vec![
            rec(3, "PRUNUS", "KITSILANO", 49.27, 2001),
            rec(1, "ACER", "DOWNTOWN", 49.25, 2003),
            rec(2, "SALIX", "SUNSET", 49.21, 2002),
        ])
    }

    #[test]
    fn default_sort_is_ascending_by_id() {
        let ds = fixture();
        let results = ResultSet::Rows(vec![0, 1, 2]);
        let rows = visible_rows(&ds, &results, &TableView::default());
        assert_eq!(rows, vec![1, 2, 0]);
    }

    #[test]
    fn clicking_the_active_column_reverses_order() {
        let ds = fixture();
        let results = ResultSet::Rows(vec![0, 1, 2]);
        let mut view = TableView::default();
        view.click(SortColumn::Year);
        assert_eq!(visible_rows(&ds, &results, &view), vec![0, 2, 1]);
        view.click(SortColumn::Year);
        assert_eq!(visible_rows(&ds, &results, &view), vec![1, 2, 0]);
    }

    #[test]
    fn search_matches_substrings_case_insensitively() {
        let ds = fixture();
        let results = ResultSet::Rows(vec![0, 1, 2]);
        let view = TableView {
            search: "kits".to_string(),
            ..TableView::default()
        };
        assert_eq!(visible_rows(&ds, &results, &view), vec![0]);
    }

    #[test]
    fn blank_results_display_no_rows() {
        let ds = fixture();
        for blank in [ResultSet::Empty, ResultSet::NotReady] {
            assert!(visible_rows(&ds, &blank, &TableView::default()).is_empty());
        }
    }

    #[test]
    fn sort_comparisons_are_total_over_floats() {
        let ds = fixture();
        let results = ResultSet::Rows(vec![0, 1, 2]);
        let view = TableView {
            sort: SortColumn::Latitude,
            ..TableView::default()
        };
        let rows = visible_rows(&ds, &results, &view);
        let lats: Vec<f64> = rows.iter().map(|&i| ds.records[i].latitude).collect();
        assert!(lats.windows(2).all(|w| w[0] <= w[1]));
    }
}
