use std::fs;
use std::path::PathBuf;

use nobel_data::data::{
    clean, duplicate_count, group_count, load_file, missing_field_counts, Category,
    DuplicatePolicy, Encoding, Field, LoadError, LoadOptions, Sex,
};

const HEADER: [&str; 12] = [
    "year",
    "category",
    "prize_share",
    "full_name",
    "sex",
    "birth_date",
    "birth_country_current",
    "birth_city",
    "organization_name",
    "organization_city",
    "organization_country",
    "ISO",
];

fn csv_line(fields: [&str; 12], delimiter: &str) -> String {
    fields.join(delimiter)
}

fn person(year: &'static str, name: &'static str, sex: &'static str) -> [&'static str; 12] {
    [
        year, "Physics", "1/2", name, sex, "1870-01-01", "Germany", "Berlin", "", "", "", "DEU",
    ]
}

fn write_fixture(dir: &tempfile::TempDir, name: &str, rows: &[[&str; 12]]) -> PathBuf {
    write_fixture_delimited(dir, name, rows, ",")
}

fn write_fixture_delimited(
    dir: &tempfile::TempDir,
    name: &str,
    rows: &[[&str; 12]],
    delimiter: &str,
) -> PathBuf {
    let mut lines = vec![csv_line(HEADER, delimiter)];
    lines.extend(rows.iter().map(|row| csv_line(*row, delimiter)));
    let path = dir.path().join(name);
    fs::write(&path, lines.join("\n")).expect("failed writing fixture");
    path
}

#[test]
fn end_to_end_load_and_clean() {
    let dir = tempfile::tempdir().expect("failed creating tempdir");
    let path = write_fixture(
        &dir,
        "sample.csv",
        &[
            person("1901", "Person A", "Male"),
            person("1903", "Person B", "Female"),
            [
                "1917", "Peace", "1/1", "", "", "", "", "",
                "International Committee of the Red Cross", "Geneva", "Switzerland", "",
            ],
        ],
    );

    let raw = load_file(&path, &LoadOptions::default()).expect("load failed");
    assert_eq!(raw.len(), 3);
    assert_eq!(duplicate_count(&raw), 0);

    let dataset = clean(&raw).expect("clean failed");
    let missing = missing_field_counts(&dataset);
    assert_eq!(missing[&Field::Sex], 1);
    assert_eq!(missing[&Field::FullName], 1);
    assert_eq!(missing[&Field::WinningAge], 1);
    assert_eq!(missing[&Field::SharePct], 0);

    assert_eq!(dataset.records[0].share_pct, Some(0.5));
    assert_eq!(dataset.records[0].winning_age, Some(31));
    assert_eq!(dataset.records[0].category, Category::Physics);
    assert_eq!(dataset.records[1].sex, Some(Sex::Female));
    assert_eq!(dataset.records[2].share_pct, Some(1.0));
    assert_eq!(dataset.records[2].winning_age, None);

    // Presence-aware split: the organization row is excluded from the
    // male/female grouping.
    let by_sex = group_count(&dataset, &["sex"]).expect("group failed");
    assert_eq!(by_sex.excluded, 1);
    assert_eq!(by_sex.total(), 2);
}

#[test]
fn missing_header_column_is_a_schema_mismatch() {
    let dir = tempfile::tempdir().expect("failed creating tempdir");
    let path = dir.path().join("bad_header.csv");
    fs::write(&path, "year,category,prize_share\n1901,Physics,1/1\n").expect("write failed");

    match load_file(&path, &LoadOptions::default()) {
        Err(LoadError::SchemaMismatch { missing }) => {
            assert!(missing.contains(&"full_name".to_string()));
            assert!(missing.contains(&"ISO".to_string()));
            assert!(!missing.contains(&"year".to_string()));
        }
        other => panic!("expected schema mismatch, got {other:?}"),
    }
}

#[test]
fn extra_columns_are_tolerated() {
    let dir = tempfile::tempdir().expect("failed creating tempdir");
    let path = dir.path().join("extra.csv");
    let header = format!("{},motivation", csv_line(HEADER, ","));
    let row = format!("{},\"in recognition of services\"", csv_line(person("1901", "Person A", "Male"), ","));
    fs::write(&path, format!("{header}\n{row}\n")).expect("write failed");

    let dataset = load_file(&path, &LoadOptions::default()).expect("load failed");
    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.records[0].full_name.as_deref(), Some("Person A"));
}

#[test]
fn delimiter_is_an_option() {
    let dir = tempfile::tempdir().expect("failed creating tempdir");
    let path = write_fixture_delimited(
        &dir,
        "semicolons.csv",
        &[person("1901", "Person A", "Male")],
        ";",
    );

    let options = LoadOptions {
        delimiter: b';',
        ..LoadOptions::default()
    };
    let dataset = load_file(&path, &options).expect("load failed");
    assert_eq!(dataset.records[0].year, 1901);
}

#[test]
fn bad_field_values_name_row_and_field() {
    let dir = tempfile::tempdir().expect("failed creating tempdir");

    let mut bad_category = person("1901", "Person A", "Male");
    bad_category[1] = "Alchemy";
    let path = write_fixture(&dir, "bad_category.csv", &[bad_category]);
    match load_file(&path, &LoadOptions::default()) {
        Err(LoadError::InvalidValue { row: 0, field: "category", value }) => {
            assert_eq!(value, "Alchemy");
        }
        other => panic!("expected invalid category, got {other:?}"),
    }

    let mut bad_year = person("1901", "Person B", "Male");
    bad_year[0] = "MCMI";
    let path = write_fixture(
        &dir,
        "bad_year.csv",
        &[person("1901", "Person A", "Male"), bad_year],
    );
    assert!(matches!(
        load_file(&path, &LoadOptions::default()),
        Err(LoadError::InvalidValue { row: 1, field: "year", .. })
    ));
}

#[test]
fn a_row_must_name_a_person_or_an_organization() {
    let dir = tempfile::tempdir().expect("failed creating tempdir");
    let path = write_fixture(
        &dir,
        "nobody.csv",
        &[[
            "1917", "Peace", "1/1", "", "", "", "", "", "", "", "", "",
        ]],
    );
    assert!(matches!(
        load_file(&path, &LoadOptions::default()),
        Err(LoadError::MissingIdentity { row: 0 })
    ));
}

#[test]
fn duplicate_policy_decides_between_logging_and_failing() {
    let dir = tempfile::tempdir().expect("failed creating tempdir");
    let path = write_fixture(
        &dir,
        "dupes.csv",
        &[
            person("1901", "Person A", "Male"),
            person("1901", "Person A", "Male"),
        ],
    );

    // Default policy only counts; the rows survive.
    let dataset = load_file(&path, &LoadOptions::default()).expect("load failed");
    assert_eq!(dataset.len(), 2);
    assert_eq!(duplicate_count(&dataset), 1);

    let strict = LoadOptions {
        duplicates: DuplicatePolicy::Fail,
        ..LoadOptions::default()
    };
    assert!(matches!(
        load_file(&path, &strict),
        Err(LoadError::DuplicateRows { count: 1 })
    ));
}

#[test]
fn json_records_load_like_csv() {
    let dir = tempfile::tempdir().expect("failed creating tempdir");
    let path = dir.path().join("sample.json");
    fs::write(
        &path,
        r#"[
            {"year": 1903, "category": "Physics", "prize_share": "1/4",
             "full_name": "Marie Curie, née Sklodowska", "sex": "Female",
             "birth_date": "1867-11-07", "birth_country_current": "Poland",
             "birth_city": "Warsaw", "ISO": "POL"},
            {"year": 1917, "category": "Peace", "prize_share": "1/1",
             "organization_name": "International Committee of the Red Cross",
             "organization_city": "Geneva", "organization_country": "Switzerland",
             "full_name": null, "sex": null}
        ]"#,
    )
    .expect("write failed");

    let raw = load_file(&path, &LoadOptions::default()).expect("load failed");
    assert_eq!(raw.len(), 2);
    assert_eq!(raw.records[0].iso.as_deref(), Some("POL"));

    let dataset = clean(&raw).expect("clean failed");
    assert_eq!(dataset.records[0].share_pct, Some(0.25));
    assert_eq!(dataset.records[0].winning_age, Some(36));
    assert_eq!(dataset.records[1].sex, None);
}

#[test]
fn non_utf8_input_fails_unless_lossy() {
    let dir = tempfile::tempdir().expect("failed creating tempdir");
    let path = dir.path().join("latin1.csv");
    let mut bytes = format!(
        "{}\n",
        csv_line(HEADER, ","),
    )
    .into_bytes();
    // "Ren\xe9" in Latin-1: invalid as UTF-8.
    bytes.extend_from_slice(b"1901,Physics,1/2,Ren\xe9,Male,1870-01-01,France,Paris,,,,FRA\n");
    fs::write(&path, &bytes).expect("write failed");

    assert!(matches!(
        load_file(&path, &LoadOptions::default()),
        Err(LoadError::NotUtf8 { .. })
    ));

    let lossy = LoadOptions {
        encoding: Encoding::Utf8Lossy,
        ..LoadOptions::default()
    };
    let dataset = load_file(&path, &lossy).expect("lossy load failed");
    assert_eq!(dataset.len(), 1);
    assert!(dataset.records[0]
        .full_name
        .as_deref()
        .expect("name present")
        .starts_with("Ren"));
}

#[test]
fn unsupported_extensions_are_rejected() {
    let dir = tempfile::tempdir().expect("failed creating tempdir");
    let path = dir.path().join("data.parquet");
    fs::write(&path, b"not parquet").expect("write failed");
    assert!(matches!(
        load_file(&path, &LoadOptions::default()),
        Err(LoadError::UnsupportedExtension(ext)) if ext == "parquet"
    ));
}
