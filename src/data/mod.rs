/// Data layer: schema types, CSV loading, and the filter/aggregate pipeline.
///
/// Architecture:
/// ```text
///      EA.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Record>, distinct-value index
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ pipeline  │  filter → FilteredView → grouped counts,
///   └──────────┘  box summaries, correlation, CSV export
/// ```
pub mod loader;
pub mod model;
pub mod pipeline;
