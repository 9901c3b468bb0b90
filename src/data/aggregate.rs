use std::collections::BTreeMap;

use super::filter::ResultSet;
use super::model::TreeDataset;

// ---------------------------------------------------------------------------
// Year/genus aggregation feeding the histogram and the chart export
// ---------------------------------------------------------------------------

/// Count of records per (planting year, genus) group.
pub type YearGenusCounts = BTreeMap<(i32, String), u64>;

/// Group the current result set by (year, genus) and count each group.
///
/// Recomputed from the result set on every interaction, never cached.
/// Blank result sets aggregate to an empty map. No binning beyond the
/// integer year, no interpolation of missing years.
pub fn count_by_year_genus(dataset: &TreeDataset, results: &ResultSet) -> YearGenusCounts {
    let mut counts = YearGenusCounts::new();
    for &i in results.indices() {
        let rec = &dataset.records[i];
        *counts.entry((rec.year, rec.genus.clone())).or_insert(0) += 1;
    }
    counts
}

/// Pivot the counts into per-genus year series, for stacked chart rendering.
pub fn by_genus(counts: &YearGenusCounts) -> BTreeMap<String, BTreeMap<i32, u64>> {
    let mut series: BTreeMap<String, BTreeMap<i32, u64>> = BTreeMap::new();
    for ((year, genus), n) in counts {
        series.entry(genus.clone()).or_default().insert(*year, *n);
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply, FilterSpec};
    use crate::data::model::TreeRecord;

    fn fixture() -> TreeDataset {
        let rec = |id, genus: &str, lat, lon, year| TreeRecord {
            id,
            genus: genus.to_string(),
            species: "X".to_string(),
            neighbourhood: "KITSILANO".to_string(),
            latitude: lat,
            longitude: lon,
            year,
        };
        TreeDataset::from_records(vec![
            rec(1, "ACER", 49.25, -123.10, 2000),
            rec(2, "PRUNUS", 49.25, -123.10, 2001),
            rec(3, "ACER", 49.28, -123.05, 2000),
        ])
    }

    #[test]
    fn counts_filtered_rows_by_year_and_genus() {
        let ds = fixture();
        let spec = FilterSpec {
            genera: ["ACER".to_string()].into_iter().collect(),
            latitude_range: (49.2, 49.29),
            longitude_range: (-123.2, -123.0),
            ..FilterSpec::default()
        };
        let counts = count_by_year_genus(&ds, &apply(&ds, &spec));
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get(&(2000, "ACER".to_string())), Some(&2));
    }

    #[test]
    fn blank_results_aggregate_to_empty() {
        let ds = fixture();
        assert!(count_by_year_genus(&ds, &ResultSet::Empty).is_empty());
        assert!(count_by_year_genus(&ds, &ResultSet::NotReady).is_empty());
    }

    #[test]
    fn pivots_counts_into_genus_series() {
        let mut counts = YearGenusCounts::new();
        counts.insert((2000, "ACER".to_string()), 2);
        counts.insert((2001, "ACER".to_string()), 1);
        counts.insert((2001, "PRUNUS".to_string()), 3);

        let series = by_genus(&counts);
        assert_eq!(series.len(), 2);
        assert_eq!(series["ACER"].get(&2000), Some(&2));
        assert_eq!(series["ACER"].get(&2001), Some(&1));
        assert_eq!(series["PRUNUS"].get(&2001), Some(&3));
    }
}
