/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + prepare → TreeDataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ TreeDataset  │  Vec<TreeRecord>, value indices (immutable)
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply FilterSpec → ResultSet
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  count by (year, genus) → histogram/export
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
