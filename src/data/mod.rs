/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → HealthDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ HealthDataset │  Vec<Observation>, country index, year bounds
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐      ┌───────────┐
///   │  filter   │ ───▶ │ aggregate │  view indices → means / year series
///   └──────────┘      └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
