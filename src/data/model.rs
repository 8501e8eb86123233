use std::fmt;

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Category / Sex – closed vocabularies
// ---------------------------------------------------------------------------

/// Prize category. The six values are fixed by the awarding institutions;
/// anything else in the input is a load error, not a new category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Chemistry,
    Economics,
    Literature,
    Medicine,
    Peace,
    Physics,
}

impl Category {
    /// Parse a category label, case-insensitively.
    pub fn parse(value: &str) -> Option<Category> {
        match value.trim().to_ascii_lowercase().as_str() {
            "chemistry" => Some(Category::Chemistry),
            "economics" => Some(Category::Economics),
            "literature" => Some(Category::Literature),
            "medicine" => Some(Category::Medicine),
            "peace" => Some(Category::Peace),
            "physics" => Some(Category::Physics),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Chemistry => "Chemistry",
            Category::Economics => "Economics",
            Category::Literature => "Literature",
            Category::Medicine => "Medicine",
            Category::Peace => "Peace",
            Category::Physics => "Physics",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Laureate sex as recorded in the source data. Absent for organizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn parse(value: &str) -> Option<Sex> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Sex::Male),
            "female" => Some(Sex::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Field – the declared schema
// ---------------------------------------------------------------------------

/// Every column the dataset declares, raw and derived. Grouping keys are
/// resolved by name against this enum, so a typo'd column is a query error
/// instead of an empty grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Year,
    Category,
    PrizeShare,
    FullName,
    Sex,
    BirthDate,
    BirthCountryCurrent,
    BirthCity,
    OrganizationName,
    OrganizationCity,
    OrganizationCountry,
    Iso,
    SharePct,
    WinningAge,
}

impl Field {
    /// All declared fields, raw and derived, in declaration order.
    pub const ALL: [Field; 14] = [
        Field::Year,
        Field::Category,
        Field::PrizeShare,
        Field::FullName,
        Field::Sex,
        Field::BirthDate,
        Field::BirthCountryCurrent,
        Field::BirthCity,
        Field::OrganizationName,
        Field::OrganizationCity,
        Field::OrganizationCountry,
        Field::Iso,
        Field::SharePct,
        Field::WinningAge,
    ];

    /// The raw columns the input header must contain (extras are tolerated).
    pub const RAW: [Field; 12] = [
        Field::Year,
        Field::Category,
        Field::PrizeShare,
        Field::FullName,
        Field::Sex,
        Field::BirthDate,
        Field::BirthCountryCurrent,
        Field::BirthCity,
        Field::OrganizationName,
        Field::OrganizationCity,
        Field::OrganizationCountry,
        Field::Iso,
    ];

    /// Header / query name of the field. `ISO` keeps the source file's
    /// capitalisation.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Year => "year",
            Field::Category => "category",
            Field::PrizeShare => "prize_share",
            Field::FullName => "full_name",
            Field::Sex => "sex",
            Field::BirthDate => "birth_date",
            Field::BirthCountryCurrent => "birth_country_current",
            Field::BirthCity => "birth_city",
            Field::OrganizationName => "organization_name",
            Field::OrganizationCity => "organization_city",
            Field::OrganizationCountry => "organization_country",
            Field::Iso => "ISO",
            Field::SharePct => "share_pct",
            Field::WinningAge => "winning_age",
        }
    }

    /// Resolve a field by its header / query name.
    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Whether the record has no value for this field. Required columns
    /// (`year`, `category`, `prize_share`) are never absent once loaded.
    pub fn is_missing(&self, record: &LaureateRecord) -> bool {
        match self {
            Field::Year | Field::Category | Field::PrizeShare => false,
            Field::FullName => record.full_name.is_none(),
            Field::Sex => record.sex.is_none(),
            Field::BirthDate => record.birth_date.is_none(),
            Field::BirthCountryCurrent => record.birth_country_current.is_none(),
            Field::BirthCity => record.birth_city.is_none(),
            Field::OrganizationName => record.organization_name.is_none(),
            Field::OrganizationCity => record.organization_city.is_none(),
            Field::OrganizationCountry => record.organization_country.is_none(),
            Field::Iso => record.iso.is_none(),
            Field::SharePct => record.share_pct.is_none(),
            Field::WinningAge => record.winning_age.is_none(),
        }
    }

    /// Display value used as a grouping key. `None` when the record has no
    /// value for the field.
    pub fn value_of(&self, record: &LaureateRecord) -> Option<String> {
        match self {
            Field::Year => Some(record.year.to_string()),
            Field::Category => Some(record.category.as_str().to_string()),
            Field::PrizeShare => Some(record.prize_share.clone()),
            Field::FullName => record.full_name.clone(),
            Field::Sex => record.sex.map(|s| s.as_str().to_string()),
            Field::BirthDate => record.birth_date.clone(),
            Field::BirthCountryCurrent => record.birth_country_current.clone(),
            Field::BirthCity => record.birth_city.clone(),
            Field::OrganizationName => record.organization_name.clone(),
            Field::OrganizationCity => record.organization_city.clone(),
            Field::OrganizationCountry => record.organization_country.clone(),
            Field::Iso => record.iso.clone(),
            Field::SharePct => record.share_pct.map(|v| v.to_string()),
            Field::WinningAge => record.winning_age.map(|v| v.to_string()),
        }
    }

    /// Numeric value for time-ordered queries. Only `year` and
    /// `winning_age` order a time axis.
    pub fn numeric_value(&self, record: &LaureateRecord) -> Option<i64> {
        match self {
            Field::Year => Some(i64::from(record.year)),
            Field::WinningAge => record.winning_age.map(i64::from),
            _ => None,
        }
    }

    /// Whether the field carries an integer value usable as a time axis.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Field::Year | Field::WinningAge)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Serialize by header name so JSON output says "year" / "ISO", not the
// variant names.
impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// LaureateRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// One (person-or-organization, prize) award. Raw columns are kept as they
/// appear in the file; the derived columns stay `None` until
/// [`clean`](super::clean::clean) has run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaureateRecord {
    pub year: i32,
    pub category: Category,
    /// Fractional credit as "numerator/denominator", e.g. "1/2".
    pub prize_share: String,
    /// Absent for organization-only awards.
    pub full_name: Option<String>,
    pub sex: Option<Sex>,
    /// Raw date text; parsed during cleaning. Absent for organizations.
    pub birth_date: Option<String>,
    pub birth_country_current: Option<String>,
    pub birth_city: Option<String>,
    pub organization_name: Option<String>,
    pub organization_city: Option<String>,
    pub organization_country: Option<String>,
    /// 3-letter country code for geographic aggregation.
    pub iso: Option<String>,

    /// Derived: prize share as a float in (0, 1].
    pub share_pct: Option<f64>,
    /// Derived: award year minus birth year. Calendar-year subtraction only,
    /// so the value can overstate the age by one year relative to the exact
    /// birthday.
    pub winning_age: Option<i32>,
}

impl LaureateRecord {
    /// Identity of the row over its raw columns. The derived columns are
    /// pure functions of the raw ones, so raw-field equality is row
    /// equality; this also sidesteps hashing the `f64` share.
    pub fn raw_identity(
        &self,
    ) -> (
        i32,
        Category,
        &str,
        Option<&str>,
        Option<Sex>,
        Option<&str>,
        Option<&str>,
        Option<&str>,
        Option<&str>,
        Option<&str>,
        Option<&str>,
        Option<&str>,
    ) {
        (
            self.year,
            self.category,
            self.prize_share.as_str(),
            self.full_name.as_deref(),
            self.sex,
            self.birth_date.as_deref(),
            self.birth_country_current.as_deref(),
            self.birth_city.as_deref(),
            self.organization_name.as_deref(),
            self.organization_city.as_deref(),
            self.organization_country.as_deref(),
            self.iso.as_deref(),
        )
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full laureate table. Immutable once built; cleaning returns a new
/// dataset instead of mutating this one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub records: Vec<LaureateRecord>,
}

impl Dataset {
    pub fn from_records(records: Vec<LaureateRecord>) -> Self {
        Dataset { records }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_name(field.name()), Some(field));
        }
        assert_eq!(Field::from_name("iso"), None); // the header spells it ISO
        assert_eq!(Field::from_name("prize"), None);
    }

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!(Category::parse("physics"), Some(Category::Physics));
        assert_eq!(Category::parse("Physics"), Some(Category::Physics));
        assert_eq!(Category::parse(" PEACE "), Some(Category::Peace));
        assert_eq!(Category::parse("alchemy"), None);
    }

    #[test]
    fn sex_parse_rejects_unknown_labels() {
        assert_eq!(Sex::parse("Female"), Some(Sex::Female));
        assert_eq!(Sex::parse("male"), Some(Sex::Male));
        assert_eq!(Sex::parse("unknown"), None);
    }
}
