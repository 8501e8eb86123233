/// Data layer: core types, loading, cleaning, and aggregate queries.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate schema → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  share_pct, winning_age → new Dataset
///   └──────────┘
///        │
///        ├──────────────────┐
///        ▼                  ▼
///   ┌──────────┐      ┌───────────┐
///   │ quality   │      │ aggregate  │  grouping, top-n,
///   └──────────┘      └───────────┘  rolling mean, cumulative
/// ```
pub mod aggregate;
pub mod clean;
pub mod loader;
pub mod model;
pub mod quality;

pub use aggregate::{
    cumulative_by_group, group_count, rolling_mean, top_n, CumulativeCount, GroupCounts,
    QueryError,
};
pub use clean::{
    clean, clean_with, CleanOptions, CleanOutcome, MalformedRows, ParseError, SkippedRow,
};
pub use loader::{load_file, DuplicatePolicy, Encoding, LoadError, LoadOptions};
pub use model::{Category, Dataset, Field, LaureateRecord, Sex};
pub use quality::{duplicate_count, missing_field_counts};
