use std::collections::{BTreeMap, HashSet};

use super::model::{Dataset, Field};

// ---------------------------------------------------------------------------
// Data-quality signals
// ---------------------------------------------------------------------------

/// Number of fully-identical rows beyond their first occurrence. A signal
/// for the caller, not an error; the loader's duplicate policy decides
/// whether it becomes one.
pub fn duplicate_count(dataset: &Dataset) -> usize {
    let mut seen = HashSet::new();
    dataset
        .records
        .iter()
        .filter(|record| !seen.insert(record.raw_identity()))
        .count()
}

/// Absent-value count for every declared field, raw and derived. Drives
/// presence-aware aggregation downstream, e.g. excluding records without a
/// recorded sex from a male/female split.
pub fn missing_field_counts(dataset: &Dataset) -> BTreeMap<Field, usize> {
    Field::ALL
        .iter()
        .map(|&field| {
            let absent = dataset
                .records
                .iter()
                .filter(|record| field.is_missing(record))
                .count();
            (field, absent)
        })
        .collect()
}
