/// Data layer: core types, loading, filtering and chart projections.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (headers trimmed, emission coerced)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ DatasetCache  │  load once, share Arc<Dataset>
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  cascading selections → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ projection  │  map / composition / top-N / stacked → Dashboard
///   └────────────┘
/// ```

pub mod cache;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod projection;
