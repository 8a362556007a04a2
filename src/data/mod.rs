/// Data layer: cell types, typed student records, loading, and search.
///
/// Architecture:
/// ```text
///  .xlsx / .xls / .ods / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  first sheet → RawTable (header row + cells)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Cohort   │  Vec<StudentRecord>, fields coerced once via schema
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  search term → visible record indices
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;
