use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use nobel_data::data::{
    clean, cumulative_by_group, duplicate_count, group_count, load_file, missing_field_counts,
    rolling_mean, top_n, CumulativeCount, Dataset, Field, GroupCounts, LoadOptions, Sex,
};

// ---------------------------------------------------------------------------
// Report – the aggregate views the charts consume
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct EarlyLaureate {
    year: i32,
    full_name: String,
    category: String,
}

#[derive(Serialize)]
struct Report {
    rows: usize,
    duplicate_rows: usize,
    missing: BTreeMap<Field, usize>,
    /// Male/female split; records without a recorded sex are excluded
    /// (donut chart input).
    sex_split: GroupCounts,
    /// Prizes per category, largest first (bar chart input).
    prizes_per_category: GroupCounts,
    /// Per-category split by sex (stacked bar input).
    category_by_sex: GroupCounts,
    /// The first women to win a Nobel Prize.
    earliest_female_laureates: Vec<EarlyLaureate>,
    /// Laureates awarded more than one prize.
    repeat_laureates: Vec<(String, usize)>,
    /// Prizes per year, ascending.
    prizes_per_year: Vec<(i64, usize)>,
    /// 5-year trailing mean of prizes per year (line overlay input).
    five_year_mean: Vec<(i64, Option<f64>)>,
    /// Top 20 birth countries, ascending for horizontal bars.
    top_birth_countries: GroupCounts,
    /// Running totals per birth country (choropleth animation input).
    cumulative_by_country: Vec<CumulativeCount>,
}

fn build_report(raw: &Dataset, dataset: &Dataset) -> Result<Report> {
    let per_year = group_count(dataset, &["year"])?;
    let mut prizes_per_year: Vec<(i64, usize)> = per_year
        .groups
        .iter()
        .filter_map(|(key, count)| key[0].parse().ok().map(|year| (year, *count)))
        .collect();
    prizes_per_year.sort_unstable();
    let yearly_series: Vec<(i64, f64)> = prizes_per_year
        .iter()
        .map(|&(year, count)| (year, count as f64))
        .collect();

    let earliest_female_laureates = {
        let mut women: Vec<&nobel_data::LaureateRecord> = dataset
            .records
            .iter()
            .filter(|r| r.sex == Some(Sex::Female))
            .collect();
        women.sort_by_key(|r| r.year);
        women
            .iter()
            .take(3)
            .map(|r| EarlyLaureate {
                year: r.year,
                full_name: r.full_name.clone().unwrap_or_default(),
                category: r.category.to_string(),
            })
            .collect()
    };

    let repeat_laureates = group_count(dataset, &["full_name"])?
        .groups
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(key, count)| (key.into_iter().next().unwrap_or_default(), count))
        .collect();

    Ok(Report {
        rows: dataset.len(),
        duplicate_rows: duplicate_count(raw),
        missing: missing_field_counts(dataset),
        sex_split: group_count(dataset, &["sex"])?,
        prizes_per_category: top_n(&group_count(dataset, &["category"])?, 6, false),
        category_by_sex: group_count(dataset, &["category", "sex"])?,
        earliest_female_laureates,
        repeat_laureates,
        five_year_mean: rolling_mean(&yearly_series, 5),
        prizes_per_year,
        top_birth_countries: top_n(&group_count(dataset, &["birth_country_current"])?, 20, true),
        cumulative_by_country: cumulative_by_group(dataset, "birth_country_current", "year")?,
    })
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

fn print_report(report: &Report) {
    println!("rows: {}", report.rows);
    println!("exact duplicate rows: {}", report.duplicate_rows);

    println!("\nmissing values per field:");
    for (field, count) in &report.missing {
        if *count > 0 {
            println!("  {:<22} {count}", field.name());
        }
    }

    println!(
        "\nmale/female split ({} records without a recorded sex excluded):",
        report.sex_split.excluded
    );
    for (key, count) in &report.sex_split.groups {
        println!("  {:<8} {count}", key[0]);
    }

    println!("\nprizes per category:");
    for (key, count) in &report.prizes_per_category.groups {
        println!("  {:<12} {count}", key[0]);
    }

    println!("\nearliest female laureates:");
    for laureate in &report.earliest_female_laureates {
        println!(
            "  {} {} ({})",
            laureate.year, laureate.full_name, laureate.category
        );
    }

    println!("\nlaureates with more than one prize:");
    for (name, count) in &report.repeat_laureates {
        println!("  {name} ({count})");
    }

    if let Some(&(first, _)) = report.prizes_per_year.first() {
        if let Some(&(last, _)) = report.prizes_per_year.last() {
            println!("\nprizes per year: {} years from {first} to {last}", report.prizes_per_year.len());
        }
    }
    let latest_mean = report
        .five_year_mean
        .iter()
        .rev()
        .find_map(|&(year, mean)| mean.map(|m| (year, m)));
    if let Some((year, mean)) = latest_mean {
        println!("5-year trailing mean, latest: {mean:.2} ({year})");
    }

    println!("\ntop birth countries (ascending for display):");
    for (key, count) in &report.top_birth_countries.groups {
        println!("  {:<28} {count}", key[0]);
    }

    println!(
        "\ncumulative prizes by country: {} points (use --json for the full series)",
        report.cumulative_by_country.len()
    );
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::init();

    let mut path: Option<String> = None;
    let mut json = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            other => path = Some(other.to_string()),
        }
    }
    let path = path.unwrap_or_else(|| "nobel_prize_data.csv".to_string());

    let options = LoadOptions::default();
    let raw = load_file(Path::new(&path), &options).with_context(|| format!("loading {path}"))?;
    let dataset = clean(&raw).context("cleaning dataset")?;

    let report = build_report(&raw, &dataset)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}
