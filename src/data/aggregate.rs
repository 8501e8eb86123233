use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use thiserror::Error;

use super::model::{Dataset, Field};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Query failures: a grouping key that is not part of the declared schema,
/// or a time axis over a non-numeric field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unknown field '{0}' in grouping key")]
    UnknownField(String),
    #[error("field '{0}' is not numeric and cannot order a time axis")]
    NotNumeric(&'static str),
}

// ---------------------------------------------------------------------------
// Grouped counts
// ---------------------------------------------------------------------------

/// Result of [`group_count`]: one entry per distinct key tuple, in
/// first-seen insertion order. The order is deterministic across runs, so
/// downstream chart rendering is reproducible.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCounts {
    /// The grouping key fields, in the order given by the caller.
    pub keys: Vec<Field>,
    /// (key tuple, member count) per group.
    pub groups: Vec<(Vec<String>, usize)>,
    /// Rows excluded because at least one key field had no value.
    pub excluded: usize,
}

impl GroupCounts {
    /// Sum of member counts across all groups.
    pub fn total(&self) -> usize {
        self.groups.iter().map(|(_, count)| count).sum()
    }
}

/// Group records by the named key field(s) and count members per group.
///
/// Composite keys group on the tuple of display values. Records missing a
/// value for any key field are excluded from grouping and surface in
/// `excluded`, so presence-aware callers can report them.
pub fn group_count(dataset: &Dataset, keys: &[&str]) -> Result<GroupCounts, QueryError> {
    let fields = resolve_fields(keys)?;

    let mut index: HashMap<Vec<String>, usize> = HashMap::new();
    let mut groups: Vec<(Vec<String>, usize)> = Vec::new();
    let mut excluded = 0usize;

    for record in &dataset.records {
        let mut key = Vec::with_capacity(fields.len());
        for field in &fields {
            match field.value_of(record) {
                Some(value) => key.push(value),
                None => break,
            }
        }
        if key.len() != fields.len() {
            excluded += 1;
            continue;
        }

        match index.get(&key) {
            Some(&slot) => groups[slot].1 += 1,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, 1));
            }
        }
    }

    Ok(GroupCounts {
        keys: fields,
        groups,
        excluded,
    })
}

/// The `n` largest groups by count, ties broken by first-seen order. With
/// `ascending_for_display` the selection is reordered ascending so a
/// horizontal bar chart puts the largest group on top.
pub fn top_n(grouped: &GroupCounts, n: usize, ascending_for_display: bool) -> GroupCounts {
    let mut groups = grouped.groups.clone();
    // Stable sort: equal counts keep their first-seen relative order.
    groups.sort_by_key(|(_, count)| Reverse(*count));
    groups.truncate(n);
    if ascending_for_display {
        groups.reverse();
    }

    GroupCounts {
        keys: grouped.keys.clone(),
        groups,
        excluded: grouped.excluded,
    }
}

// ---------------------------------------------------------------------------
// Time-ordered aggregates
// ---------------------------------------------------------------------------

/// Trailing simple moving average over a time-ordered series. A position is
/// defined only once `window` values (including its own) are available;
/// earlier positions yield `None`, never a padded zero.
pub fn rolling_mean(series: &[(i64, f64)], window: usize) -> Vec<(i64, Option<f64>)> {
    series
        .iter()
        .enumerate()
        .map(|(i, &(time, _))| {
            if window == 0 || i + 1 < window {
                return (time, None);
            }
            let trailing = &series[i + 1 - window..=i];
            let mean = trailing.iter().map(|&(_, value)| value).sum::<f64>() / window as f64;
            (time, Some(mean))
        })
        .collect()
}

/// One point of a per-group running total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CumulativeCount {
    pub group: String,
    pub time: i64,
    pub total: u64,
}

/// Running total of record counts per group, ordered by the numeric time
/// key ascending. Groups enumerate in first-seen order; within a group,
/// every time step of its observed range appears, carrying the total
/// forward through gaps (a year without prizes keeps the previous total).
pub fn cumulative_by_group(
    dataset: &Dataset,
    group_key: &str,
    time_key: &str,
) -> Result<Vec<CumulativeCount>, QueryError> {
    let group_field = resolve_field(group_key)?;
    let time_field = resolve_field(time_key)?;
    if !time_field.is_numeric() {
        return Err(QueryError::NotNumeric(time_field.name()));
    }

    let mut order: Vec<String> = Vec::new();
    let mut per_group: HashMap<String, BTreeMap<i64, u64>> = HashMap::new();

    for record in &dataset.records {
        let (Some(group), Some(time)) = (
            group_field.value_of(record),
            time_field.numeric_value(record),
        ) else {
            continue;
        };
        if !per_group.contains_key(&group) {
            order.push(group.clone());
        }
        *per_group.entry(group).or_default().entry(time).or_insert(0) += 1;
    }

    let mut out = Vec::new();
    for group in order {
        let counts = &per_group[&group];
        let (Some(&first), Some(&last)) = (
            counts.keys().next(),
            counts.keys().next_back(),
        ) else {
            continue;
        };

        let mut total = 0u64;
        for time in first..=last {
            total += counts.get(&time).copied().unwrap_or(0);
            out.push(CumulativeCount {
                group: group.clone(),
                time,
                total,
            });
        }
    }

    Ok(out)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_field(name: &str) -> Result<Field, QueryError> {
    Field::from_name(name).ok_or_else(|| QueryError::UnknownField(name.to_string()))
}

fn resolve_fields(names: &[&str]) -> Result<Vec<Field>, QueryError> {
    names.iter().map(|name| resolve_field(name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Category, LaureateRecord, Sex};

    fn record(year: i32, category: Category, sex: Option<Sex>, country: &str) -> LaureateRecord {
        LaureateRecord {
            year,
            category,
            prize_share: "1/1".to_string(),
            full_name: Some(format!("Laureate {year} {category}")),
            sex,
            birth_date: None,
            birth_country_current: Some(country.to_string()),
            birth_city: None,
            organization_name: None,
            organization_city: None,
            organization_country: None,
            iso: None,
            share_pct: None,
            winning_age: None,
        }
    }

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            record(1901, Category::Physics, Some(Sex::Male), "Germany"),
            record(1901, Category::Peace, Some(Sex::Male), "Switzerland"),
            record(1903, Category::Physics, Some(Sex::Female), "Poland"),
            record(1903, Category::Physics, Some(Sex::Male), "France"),
            record(1905, Category::Peace, None, "Austria"),
        ])
    }

    #[test]
    fn group_counts_sum_to_dataset_size() {
        let dataset = sample();
        let by_category = group_count(&dataset, &["category"]).unwrap();
        assert_eq!(by_category.total() + by_category.excluded, dataset.len());
        assert_eq!(by_category.excluded, 0);
    }

    #[test]
    fn groups_enumerate_in_first_seen_order() {
        let by_category = group_count(&sample(), &["category"]).unwrap();
        let names: Vec<&str> = by_category
            .groups
            .iter()
            .map(|(key, _)| key[0].as_str())
            .collect();
        assert_eq!(names, ["Physics", "Peace"]);
        assert_eq!(by_category.groups[0].1, 3);
    }

    #[test]
    fn composite_keys_group_on_tuples_and_exclude_missing() {
        let by_category_sex = group_count(&sample(), &["category", "sex"]).unwrap();
        assert_eq!(by_category_sex.excluded, 1); // the record without a sex
        assert_eq!(
            by_category_sex.groups,
            vec![
                (vec!["Physics".to_string(), "Male".to_string()], 2),
                (vec!["Peace".to_string(), "Male".to_string()], 1),
                (vec!["Physics".to_string(), "Female".to_string()], 1),
            ]
        );
    }

    #[test]
    fn unknown_key_is_a_query_error() {
        assert_eq!(
            group_count(&sample(), &["categry"]),
            Err(QueryError::UnknownField("categry".to_string()))
        );
        assert_eq!(
            cumulative_by_group(&sample(), "category", "sex"),
            Err(QueryError::NotNumeric("sex"))
        );
    }

    #[test]
    fn top_n_truncates_and_orders() {
        let mut dataset = sample();
        dataset
            .records
            .push(record(1910, Category::Chemistry, Some(Sex::Male), "Sweden"));
        dataset
            .records
            .push(record(1911, Category::Chemistry, Some(Sex::Female), "Sweden"));

        let by_category = group_count(&dataset, &["category"]).unwrap();
        let top = top_n(&by_category, 2, false);
        assert_eq!(top.groups.len(), 2);
        assert_eq!(top.groups[0].0[0], "Physics");
        // Peace and Chemistry tie at 2; Peace was seen first.
        assert_eq!(top.groups[1].0[0], "Peace");

        let display = top_n(&by_category, 2, true);
        let counts: Vec<usize> = display.groups.iter().map(|(_, c)| *c).collect();
        assert!(counts.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(display.groups.last().unwrap().0[0], "Physics");
    }

    #[test]
    fn top_n_larger_than_group_count_returns_everything() {
        let by_category = group_count(&sample(), &["category"]).unwrap();
        assert_eq!(top_n(&by_category, 20, true).groups.len(), 2);
    }

    #[test]
    fn rolling_mean_matches_trailing_window_semantics() {
        let series: Vec<(i64, f64)> = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0]
            .iter()
            .enumerate()
            .map(|(i, &v)| (1901 + i as i64, v))
            .collect();

        let means = rolling_mean(&series, 5);
        assert_eq!(means.len(), 6);
        for (_, mean) in &means[..4] {
            assert_eq!(*mean, None);
        }
        assert_eq!(means[4], (1905, Some(30.0)));
        assert_eq!(means[5], (1906, Some(40.0)));
    }

    #[test]
    fn rolling_mean_window_wider_than_series_is_all_undefined() {
        let series = [(1901, 1.0), (1902, 2.0)];
        assert!(rolling_mean(&series, 5).iter().all(|(_, m)| m.is_none()));
        assert!(rolling_mean(&series, 0).iter().all(|(_, m)| m.is_none()));
    }

    #[test]
    fn cumulative_totals_carry_through_gap_years() {
        let dataset = Dataset::from_records(vec![
            record(1990, Category::Physics, Some(Sex::Male), "USA"),
            record(1990, Category::Peace, Some(Sex::Female), "USA"),
            record(1992, Category::Physics, Some(Sex::Male), "USA"),
            record(1992, Category::Chemistry, Some(Sex::Male), "USA"),
            record(1992, Category::Medicine, Some(Sex::Male), "USA"),
            record(1991, Category::Physics, Some(Sex::Male), "France"),
        ]);

        let cumulative =
            cumulative_by_group(&dataset, "birth_country_current", "year").unwrap();
        let usa: Vec<(i64, u64)> = cumulative
            .iter()
            .filter(|c| c.group == "USA")
            .map(|c| (c.time, c.total))
            .collect();
        assert_eq!(usa, vec![(1990, 2), (1991, 2), (1992, 5)]);

        // First-seen group order: USA rows precede France rows.
        assert_eq!(cumulative[0].group, "USA");
        assert_eq!(
            cumulative.last().unwrap(),
            &CumulativeCount {
                group: "France".to_string(),
                time: 1991,
                total: 1
            }
        );
    }
}
