use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{info, warn};
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Category, Dataset, Field, LaureateRecord, Sex};
use super::quality::duplicate_count;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Input text encoding. The source file is expected to be UTF-8; `Utf8Lossy`
/// substitutes replacement characters instead of failing on stray bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Utf8Lossy,
}

/// What to do when the input contains fully-identical rows: count and log
/// by default, hard failure on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    #[default]
    CountAndLog,
    Fail,
}

/// Parameters of [`load_file`].
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// CSV field delimiter.
    pub delimiter: u8,
    pub encoding: Encoding,
    pub duplicates: DuplicatePolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            delimiter: b',',
            encoding: Encoding::default(),
            duplicates: DuplicatePolicy::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Load failures: unreadable input, schema mismatch, or a row value that
/// does not fit the declared column type. Row numbers are zero-based data
/// rows (the header is not counted).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("input is not valid UTF-8 (first invalid byte at offset {offset})")]
    NotUtf8 { offset: usize },
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a top-level JSON array of record objects")]
    JsonShape,
    #[error("row {row}: expected a JSON object")]
    JsonRow { row: usize },
    #[error("header is missing required column(s): {}", missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },
    #[error("row {row}: invalid {field} value '{value}'")]
    InvalidValue {
        row: usize,
        field: &'static str,
        value: String,
    },
    #[error("row {row}: neither full_name nor organization_name is present")]
    MissingIdentity { row: usize },
    #[error("input contains {count} exact duplicate row(s)")]
    DuplicateRows { count: usize },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a laureate dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – delimited text with a header row (delimiter from options)
/// * `.json` – records-oriented array, the default `df.to_json(orient='records')`
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path, options)?,
        "json" => load_json(path, options)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    let duplicates = duplicate_count(&dataset);
    if duplicates > 0 {
        match options.duplicates {
            DuplicatePolicy::Fail => return Err(LoadError::DuplicateRows { count: duplicates }),
            DuplicatePolicy::CountAndLog => {
                warn!("{duplicates} exact duplicate row(s) in {}", path.display());
            }
        }
    }

    info!("loaded {} laureate rows from {}", dataset.len(), path.display());
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row naming at least the twelve declared raw columns
/// (extra columns are ignored), one award per row, empty cells for absent
/// values.
fn load_csv(path: &Path, options: &LoadOptions) -> Result<Dataset, LoadError> {
    let text = read_text(path, options.encoding)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    // Map every declared raw column to its header position up front; a
    // missing column is a schema mismatch, not a per-row surprise.
    let mut positions = BTreeMap::new();
    let mut missing = Vec::new();
    for field in Field::RAW {
        match headers.iter().position(|h| h == field.name()) {
            Some(idx) => {
                positions.insert(field, idx);
            }
            None => missing.push(field.name().to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(LoadError::SchemaMismatch { missing });
    }

    let column = |record: &csv::StringRecord, field: Field| -> Option<String> {
        non_empty(record.get(positions[&field]).unwrap_or(""))
    };

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;

        let year = required(row, Field::Year, column(&record, Field::Year))?;
        let year: i32 = year
            .parse()
            .map_err(|_| invalid(row, Field::Year, &year))?;

        let category = required(row, Field::Category, column(&record, Field::Category))?;
        let category =
            Category::parse(&category).ok_or_else(|| invalid(row, Field::Category, &category))?;

        let prize_share = required(row, Field::PrizeShare, column(&record, Field::PrizeShare))?;

        let sex = match column(&record, Field::Sex) {
            Some(raw) => Some(Sex::parse(&raw).ok_or_else(|| invalid(row, Field::Sex, &raw))?),
            None => None,
        };

        let laureate = LaureateRecord {
            year,
            category,
            prize_share,
            full_name: column(&record, Field::FullName),
            sex,
            birth_date: column(&record, Field::BirthDate),
            birth_country_current: column(&record, Field::BirthCountryCurrent),
            birth_city: column(&record, Field::BirthCity),
            organization_name: column(&record, Field::OrganizationName),
            organization_city: column(&record, Field::OrganizationCity),
            organization_country: column(&record, Field::OrganizationCountry),
            iso: column(&record, Field::Iso),
            share_pct: None,
            winning_age: None,
        };

        check_identity(row, &laureate)?;
        records.push(laureate);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   {
///     "year": 1903,
///     "category": "Physics",
///     "prize_share": "1/4",
///     "full_name": "Marie Curie, née Sklodowska",
///     "sex": "Female",
///     ...
///   },
///   ...
/// ]
/// ```
///
/// Absent values may be omitted or `null`.
fn load_json(path: &Path, options: &LoadOptions) -> Result<Dataset, LoadError> {
    let text = read_text(path, options.encoding)?;
    let root: JsonValue = serde_json::from_str(&text)?;
    let rows = root.as_array().ok_or(LoadError::JsonShape)?;

    let mut records = Vec::with_capacity(rows.len());
    for (row, value) in rows.iter().enumerate() {
        let obj = value.as_object().ok_or(LoadError::JsonRow { row })?;

        let year = obj
            .get(Field::Year.name())
            .and_then(JsonValue::as_i64)
            .and_then(|y| i32::try_from(y).ok())
            .ok_or_else(|| invalid(row, Field::Year, &json_text(obj.get(Field::Year.name()))))?;

        let category = required(row, Field::Category, json_str(obj, Field::Category))?;
        let category =
            Category::parse(&category).ok_or_else(|| invalid(row, Field::Category, &category))?;

        let prize_share = required(row, Field::PrizeShare, json_str(obj, Field::PrizeShare))?;

        let sex = match json_str(obj, Field::Sex) {
            Some(raw) => Some(Sex::parse(&raw).ok_or_else(|| invalid(row, Field::Sex, &raw))?),
            None => None,
        };

        let laureate = LaureateRecord {
            year,
            category,
            prize_share,
            full_name: json_str(obj, Field::FullName),
            sex,
            birth_date: json_str(obj, Field::BirthDate),
            birth_country_current: json_str(obj, Field::BirthCountryCurrent),
            birth_city: json_str(obj, Field::BirthCity),
            organization_name: json_str(obj, Field::OrganizationName),
            organization_city: json_str(obj, Field::OrganizationCity),
            organization_country: json_str(obj, Field::OrganizationCountry),
            iso: json_str(obj, Field::Iso),
            share_pct: None,
            winning_age: None,
        };

        check_identity(row, &laureate)?;
        records.push(laureate);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read the whole file as text, tolerating a UTF-8 BOM.
fn read_text(path: &Path, encoding: Encoding) -> Result<String, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let bytes = bytes
        .strip_prefix(b"\xef\xbb\xbf")
        .unwrap_or(bytes.as_slice());

    match encoding {
        Encoding::Utf8 => std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| LoadError::NotUtf8 {
                offset: e.valid_up_to(),
            }),
        Encoding::Utf8Lossy => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Empty and whitespace-only cells count as absent.
fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn required(row: usize, field: Field, value: Option<String>) -> Result<String, LoadError> {
    value.ok_or(LoadError::InvalidValue {
        row,
        field: field.name(),
        value: String::new(),
    })
}

fn invalid(row: usize, field: Field, value: &str) -> LoadError {
    LoadError::InvalidValue {
        row,
        field: field.name(),
        value: value.to_string(),
    }
}

/// A record with no person name must at least name an organization;
/// anything else identifies nobody.
fn check_identity(row: usize, record: &LaureateRecord) -> Result<(), LoadError> {
    if record.full_name.is_none() && record.organization_name.is_none() {
        return Err(LoadError::MissingIdentity { row });
    }
    Ok(())
}

fn json_str(obj: &serde_json::Map<String, JsonValue>, field: Field) -> Option<String> {
    match obj.get(field.name()) {
        Some(JsonValue::String(s)) => non_empty(s),
        Some(JsonValue::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn json_text(value: Option<&JsonValue>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
