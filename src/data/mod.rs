/// Data layer: core types, loading, and ordering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<ExperimentRow> (invalid rows dropped)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ ExperimentRow │  model, dataset, output_len, mse, mae
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply model/dataset ordering overrides
///   └──────────┘
/// ```

pub mod decimal;
pub mod loader;
pub mod model;
pub mod filter;
