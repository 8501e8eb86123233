//! Nobel Prize laureate dataset: loading, cleaning, and aggregate queries.
//!
//! The crate turns the static laureate CSV into an immutable, typed,
//! in-memory dataset and answers the aggregate questions a charting or
//! reporting layer asks of it (grouped counts, top-n selections, trailing
//! means, cumulative totals). Rendering itself is out of scope; the
//! `nobel-report` binary shows the intended consumption pattern.

pub mod data;

pub use data::{
    clean, cumulative_by_group, duplicate_count, group_count, load_file, missing_field_counts,
    rolling_mean, top_n, Dataset, Field, LaureateRecord, LoadError, LoadOptions, ParseError,
    QueryError,
};
