use std::collections::BTreeSet;

use super::model::TreeDataset;

// ---------------------------------------------------------------------------
// Absolute slider bounds
// ---------------------------------------------------------------------------

/// Fixed absolute latitude bound for the range sliders.
pub const LAT_BOUNDS: (f64, f64) = (49.2000, 49.2900);
/// Fixed absolute longitude bound for the range sliders.
pub const LON_BOUNDS: (f64, f64) = (-123.2000, -123.0000);

// ---------------------------------------------------------------------------
// FilterSpec – the current filter criteria
// ---------------------------------------------------------------------------

/// One snapshot of the user's filter criteria.
///
/// An empty `genera` set matches nothing (clearing every genus checkbox
/// blanks the output; deliberate, matching the source behaviour).
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    /// Selected genus values.
    pub genera: BTreeSet<String>,
    /// Whether the neighbourhood filter is active.
    pub neighbourhood_enabled: bool,
    /// Selected neighbourhood; `None` until the selector is initialized.
    pub neighbourhood: Option<String>,
    /// Closed latitude interval [min, max].
    pub latitude_range: (f64, f64),
    /// Closed longitude interval [min, max].
    pub longitude_range: (f64, f64),
}

impl Default for FilterSpec {
    fn default() -> Self {
        FilterSpec {
            genera: BTreeSet::new(),
            neighbourhood_enabled: false,
            neighbourhood: None,
            latitude_range: LAT_BOUNDS,
            longitude_range: LON_BOUNDS,
        }
    }
}

// ---------------------------------------------------------------------------
// ResultSet – the filtered subset, or a distinguished blank marker
// ---------------------------------------------------------------------------

/// Outcome of applying a [`FilterSpec`] to the prepared table.
///
/// `NotReady` and `Empty` both render as blank output downstream, but
/// they are distinct states: `NotReady` means the neighbourhood filter
/// was requested before its selector had a value, `Empty` is a
/// legitimate zero-row match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultSet {
    /// Filters not yet initialized; no computation was attempted.
    NotReady,
    /// Valid filter, zero matching rows.
    Empty,
    /// Indices into the prepared table, in original table order.
    Rows(Vec<usize>),
}

impl ResultSet {
    /// Matching indices; the blank markers yield an empty slice.
    pub fn indices(&self) -> &[usize] {
        match self {
            ResultSet::Rows(idx) => idx,
            ResultSet::NotReady | ResultSet::Empty => &[],
        }
    }

    /// Number of matching rows.
    pub fn len(&self) -> usize {
        self.indices().len()
    }

    /// Whether this result renders as blank output.
    pub fn is_blank(&self) -> bool {
        !matches!(self, ResultSet::Rows(_))
    }
}

// ---------------------------------------------------------------------------
// apply – the filter pipeline
// ---------------------------------------------------------------------------

/// Apply a filter spec to the prepared table.
///
/// A record survives when:
/// * its `genus` is in `spec.genera` (empty selection ⇒ nothing survives)
/// * the neighbourhood filter is off, or its `neighbourhood` matches
/// * `latitude` lies in `spec.latitude_range` (inclusive both ends)
/// * `longitude` lies in `spec.longitude_range` (inclusive both ends)
///
/// Inverted range bounds (min > max) simply match nothing. Pure over its
/// inputs; identical inputs always yield identical results.
pub fn apply(dataset: &TreeDataset, spec: &FilterSpec) -> ResultSet {
    // The neighbourhood filter was requested before the selector resolved
    // a value: no legitimate answer exists yet.
    if spec.neighbourhood_enabled && spec.neighbourhood.is_none() {
        return ResultSet::NotReady;
    }

    let (lat_min, lat_max) = spec.latitude_range;
    let (lon_min, lon_max) = spec.longitude_range;

    let indices: Vec<usize> = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            if !spec.genera.contains(&rec.genus) {
                return false;
            }
            if spec.neighbourhood_enabled
                && spec.neighbourhood.as_deref() != Some(rec.neighbourhood.as_str())
            {
                return false;
            }
            rec.latitude >= lat_min
                && rec.latitude <= lat_max
                && rec.longitude >= lon_min
                && rec.longitude <= lon_max
        })
        .map(|(i, _)| i)
        .collect();

    if indices.is_empty() {
        ResultSet::Empty
    } else {
        ResultSet::Rows(indices)
    }
}
