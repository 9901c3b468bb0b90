use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TreeRecord – one row of the prepared table
// ---------------------------------------------------------------------------

/// A single planted tree (one row of the prepared table).
///
/// Field order matters: it is the canonical column order of the CSV
/// export header (`id,genus,species,neighbourhood,latitude,longitude,year`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeRecord {
    /// Stable, opaque identifier from the source extract.
    pub id: u64,
    pub genus: String,
    pub species: String,
    pub neighbourhood: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Calendar year of planting, derived from the source date.
    pub year: i32,
}

// ---------------------------------------------------------------------------
// TreeDataset – the complete prepared table
// ---------------------------------------------------------------------------

/// The prepared, immutable table with pre-computed value indices.
///
/// Built once at startup; every record is guaranteed to carry a valid
/// `year` and coordinates (rows missing either were dropped during
/// preparation). Never mutated afterwards.
#[derive(Debug, Clone)]
pub struct TreeDataset {
    /// All prepared records, in source order.
    pub records: Vec<TreeRecord>,
    /// Sorted distinct genus values, for populating the genus filter.
    pub genera: BTreeSet<String>,
    /// Sorted distinct neighbourhood values, for the neighbourhood combo.
    pub neighbourhoods: BTreeSet<String>,
}

impl TreeDataset {
    /// Build the value indices from prepared records.
    pub fn from_records(records: Vec<TreeRecord>) -> Self {
        let mut genera = BTreeSet::new();
        let mut neighbourhoods = BTreeSet::new();
        let mut seen_ids = BTreeSet::new();

        for rec in &records {
            genera.insert(rec.genus.clone());
            neighbourhoods.insert(rec.neighbourhood.clone());
            if !seen_ids.insert(rec.id) {
                log::warn!("duplicate tree id {} in source data", rec.id);
            }
        }

        TreeDataset {
            records,
            genera,
            neighbourhoods,
        }
    }

    /// Number of prepared records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the prepared table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
