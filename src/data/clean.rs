use chrono::{Datelike, NaiveDate};
use log::warn;
use thiserror::Error;

use super::model::{Dataset, LaureateRecord};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Cleaning failures. Each variant names the offending row (zero-based) and
/// carries the raw value so callers can decide whether to abort or skip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("row {row}: prize_share '{value}' is not of the form \"int/int\"")]
    PrizeShareForm { row: usize, value: String },
    #[error("row {row}: prize_share '{value}' has a zero denominator")]
    PrizeShareZeroDenominator { row: usize, value: String },
    #[error("row {row}: unparseable birth_date '{value}'")]
    BirthDate { row: usize, value: String },
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// What to do with a row that fails to parse: abort the whole run (default)
/// or drop the row and report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedRows {
    #[default]
    Abort,
    Skip,
}

/// Parameters of [`clean_with`].
#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    pub malformed: MalformedRows,
}

/// A row dropped under [`MalformedRows::Skip`], with the error that felled it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub row: usize,
    pub error: ParseError,
}

/// Result of a lenient cleaning pass.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub dataset: Dataset,
    pub skipped: Vec<SkippedRow>,
}

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

/// Compute the derived columns for every record: `share_pct` from
/// `prize_share`, and `winning_age` where a birth date is present.
///
/// Returns a new dataset; the input is untouched. Re-cleaning an already
/// clean dataset recomputes the same values from the same raw columns, so
/// the operation is idempotent.
pub fn clean(dataset: &Dataset) -> Result<Dataset, ParseError> {
    clean_with(dataset, &CleanOptions::default()).map(|outcome| outcome.dataset)
}

/// [`clean`] with configurable malformed-row handling. Under
/// [`MalformedRows::Skip`] offending rows are dropped, logged, and reported
/// in the outcome instead of aborting the run.
pub fn clean_with(dataset: &Dataset, options: &CleanOptions) -> Result<CleanOutcome, ParseError> {
    let mut records = Vec::with_capacity(dataset.len());
    let mut skipped = Vec::new();

    for (row, record) in dataset.records.iter().enumerate() {
        match clean_record(row, record) {
            Ok(cleaned) => records.push(cleaned),
            Err(error) => match options.malformed {
                MalformedRows::Abort => return Err(error),
                MalformedRows::Skip => {
                    warn!("skipping malformed row: {error}");
                    skipped.push(SkippedRow { row, error });
                }
            },
        }
    }

    Ok(CleanOutcome {
        dataset: Dataset::from_records(records),
        skipped,
    })
}

fn clean_record(row: usize, record: &LaureateRecord) -> Result<LaureateRecord, ParseError> {
    let mut cleaned = record.clone();
    cleaned.share_pct = Some(parse_prize_share(row, &record.prize_share)?);
    cleaned.winning_age = match &record.birth_date {
        // Calendar-year subtraction, no month/day adjustment; the age can
        // be off by one year relative to the exact birthday.
        Some(raw) => Some(record.year - parse_birth_date(row, raw)?.year()),
        None => None,
    };
    Ok(cleaned)
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

/// Parse a "numerator/denominator" share into a float. Exactly two integer
/// components; a zero denominator is rejected, never coerced.
pub fn parse_prize_share(row: usize, value: &str) -> Result<f64, ParseError> {
    let form_error = || ParseError::PrizeShareForm {
        row,
        value: value.to_string(),
    };

    let parts: Vec<&str> = value.split('/').collect();
    if parts.len() != 2 {
        return Err(form_error());
    }
    let numerator: u32 = parts[0].trim().parse().map_err(|_| form_error())?;
    let denominator: u32 = parts[1].trim().parse().map_err(|_| form_error())?;
    if denominator == 0 {
        return Err(ParseError::PrizeShareZeroDenominator {
            row,
            value: value.to_string(),
        });
    }

    Ok(f64::from(numerator) / f64::from(denominator))
}

/// Parse a birth date. ISO `YYYY-MM-DD` is the source format; `MM/DD/YYYY`
/// is accepted for re-exported files.
pub fn parse_birth_date(row: usize, value: &str) -> Result<NaiveDate, ParseError> {
    const FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

    let trimmed = value.trim();
    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }
    Err(ParseError::BirthDate {
        row,
        value: value.to_string(),
    })
}
