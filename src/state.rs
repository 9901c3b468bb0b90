use std::collections::BTreeSet;

use crate::color::GenusColors;
use crate::data::aggregate::{count_by_year_genus, YearGenusCounts};
use crate::data::filter::{apply, FilterSpec, ResultSet, LAT_BOUNDS, LON_BOUNDS};
use crate::data::model::TreeDataset;
use crate::profile::Profile;
use crate::ui::table::TableView;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which central view is active (classic profile shows these as tabs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Chart,
    Table,
}

/// The full UI state, independent of rendering.
///
/// The dataset is loaded once at startup and never mutated; every user
/// interaction rebuilds `results` and `counts` from the current spec.
pub struct AppState {
    /// The prepared, immutable table.
    pub dataset: TreeDataset,

    /// Active cosmetic variant.
    pub profile: Profile,

    /// Current filter criteria.
    pub spec: FilterSpec,

    /// Result of the last `refilter()` (cached until the next interaction).
    pub results: ResultSet,

    /// Year/genus aggregation of `results`, feeding chart and export.
    pub counts: YearGenusCounts,

    /// Genus → colour mapping shared by chart, checkboxes, and export.
    pub colors: GenusColors,

    /// Base hue of the palette (noir profile's picker re-seeds this).
    pub base_hue: f32,

    /// Active central view.
    pub tab: Tab,

    /// Presentation-only table state (sort column, search text).
    pub table: TableView,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the initial state: profile defaults intersected with the
    /// dataset's actual distinct values, full coordinate bounds, first
    /// filter pass already applied.
    pub fn new(dataset: TreeDataset, profile: Profile) -> Self {
        let spec = default_spec(&dataset, profile);
        let colors = GenusColors::new(&dataset.genera, 0.0);
        let mut state = AppState {
            dataset,
            profile,
            spec,
            results: ResultSet::Empty,
            counts: YearGenusCounts::new(),
            colors,
            base_hue: 0.0,
            tab: Tab::Chart,
            table: TableView::default(),
            status_message: None,
        };
        state.refilter();
        state
    }

    /// Recompute the result set and its aggregation from the current spec.
    pub fn refilter(&mut self) {
        self.results = apply(&self.dataset, &self.spec);
        self.counts = count_by_year_genus(&self.dataset, &self.results);
    }

    /// Toggle a single genus in the selection.
    pub fn toggle_genus(&mut self, genus: &str) {
        if !self.spec.genera.remove(genus) {
            self.spec.genera.insert(genus.to_string());
        }
        self.refilter();
    }

    /// Select every genus present in the dataset.
    pub fn select_all_genera(&mut self) {
        self.spec.genera = self.dataset.genera.clone();
        self.refilter();
    }

    /// Clear the genus selection (matches nothing until re-selected).
    pub fn select_no_genera(&mut self) {
        self.spec.genera.clear();
        self.refilter();
    }

    /// Restore the profile's default filter values.
    pub fn reset_filters(&mut self) {
        self.spec = default_spec(&self.dataset, self.profile);
        self.refilter();
    }

    /// Re-seed the palette base hue (noir profile's colour picker).
    pub fn set_base_hue(&mut self, hue: f32) {
        self.base_hue = hue;
        self.colors = GenusColors::new(&self.dataset.genera, hue);
    }
}

/// The profile's default filter values, intersected with the dataset.
fn default_spec(dataset: &TreeDataset, profile: Profile) -> FilterSpec {
    let genera: BTreeSet<String> = profile
        .default_genera()
        .iter()
        .filter(|g| dataset.genera.contains(**g))
        .map(|g| g.to_string())
        .collect();

    FilterSpec {
        genera,
        neighbourhood_enabled: false,
        neighbourhood: resolve_neighbourhood(dataset, profile.default_neighbourhood()),
        latitude_range: LAT_BOUNDS,
        longitude_range: LON_BOUNDS,
    }
}

/// Resolve a profile's default neighbourhood against the dataset: keep
/// it when present, otherwise fall back to the first distinct value.
/// `None` (empty dataset) leaves the selector uninitialized, which the
/// pipeline reports as NotReady while the filter is enabled.
fn resolve_neighbourhood(dataset: &TreeDataset, preferred: &str) -> Option<String> {
    if dataset.neighbourhoods.contains(preferred) {
        Some(preferred.to_string())
    } else {
        dataset.neighbourhoods.iter().next().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::TreeRecord;

    fn fixture() -> TreeDataset {
        let rec = |id, genus: &str, hood: &str, year| TreeRecord {
            id,
            genus: genus.to_string(),
            species: "X".to_string(),
            neighbourhood: hood.to_string(),
            latitude: 49.25,
            longitude: -123.10,
            year,
        };
        TreeDataset::from_records(vec![
            rec(1, "ACER", "KITSILANO", 2000),
            rec(2, "PRUNUS", "DOWNTOWN", 2001),
            rec(3, "SALIX", "SUNSET", 2002),
        ])
    }

    #[test]
    fn defaults_intersect_with_dataset_genera() {
        let state = AppState::new(fixture(), Profile::Classic);
        // QUERCUS is a default but absent from the data.
        let selected: Vec<&String> = state.spec.genera.iter().collect();
        assert_eq!(selected, vec!["ACER", "PRUNUS"]);
        assert_eq!(state.spec.neighbourhood.as_deref(), Some("KITSILANO"));
        assert_eq!(state.results.len(), 2);
    }

    #[test]
    fn missing_default_neighbourhood_falls_back_to_first() {
        let state = AppState::new(fixture(), Profile::Noir);
        // DOWNTOWN exists, so noir keeps its default.
        assert_eq!(state.spec.neighbourhood.as_deref(), Some("DOWNTOWN"));

        let empty = AppState::new(TreeDataset::from_records(Vec::new()), Profile::Noir);
        assert_eq!(empty.spec.neighbourhood, None);
    }

    #[test]
    fn toggling_a_genus_refilters() {
        let mut state = AppState::new(fixture(), Profile::Classic);
        state.toggle_genus("PRUNUS");
        assert_eq!(state.results.len(), 1);
        state.toggle_genus("PRUNUS");
        assert_eq!(state.results.len(), 2);
    }

    #[test]
    fn select_none_blanks_the_output() {
        let mut state = AppState::new(fixture(), Profile::Classic);
        state.select_no_genera();
        assert_eq!(state.results, ResultSet::Empty);
        assert!(state.counts.is_empty());

        state.select_all_genera();
        assert_eq!(state.results.len(), 3);
    }

    #[test]
    fn reset_restores_profile_defaults() {
        let mut state = AppState::new(fixture(), Profile::Classic);
        state.select_all_genera();
        state.spec.latitude_range = (49.25, 49.25);
        state.reset_filters();
        assert_eq!(state.spec.latitude_range, LAT_BOUNDS);
        assert_eq!(state.spec.genera.len(), 2);
    }
}
