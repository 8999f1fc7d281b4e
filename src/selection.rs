// 🎛️ Selections - fixed vocabularies for region, month and weekday
// Text is validated here, everything downstream works with enums

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

/// Raised when user text is outside a fixed vocabulary
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("invalid {kind} name: '{value}'")]
    Invalid { kind: &'static str, value: String },
}

impl SelectionError {
    fn invalid(kind: &'static str, value: &str) -> Self {
        SelectionError::Invalid {
            kind,
            value: value.to_string(),
        }
    }
}

/// Normalize raw input the way every prompt does: trimmed, lowercase
fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

// ============================================================================
// REGION
// ============================================================================

/// Region - Which city dataset to analyze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Chicago,
    NewYorkCity,
    Washington,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Chicago, Region::NewYorkCity, Region::Washington];

    /// Lowercase name, as typed at the prompt
    pub fn name(&self) -> &'static str {
        match self {
            Region::Chicago => "chicago",
            Region::NewYorkCity => "new york city",
            Region::Washington => "washington",
        }
    }

    /// Human-readable name for display
    pub fn title(&self) -> &'static str {
        match self {
            Region::Chicago => "Chicago",
            Region::NewYorkCity => "New York City",
            Region::Washington => "Washington",
        }
    }

    /// Dataset file backing this region
    pub fn file_name(&self) -> &'static str {
        match self {
            Region::Chicago => "chicago.csv",
            Region::NewYorkCity => "new_york_city.csv",
            Region::Washington => "washington.csv",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Region {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Region::ALL
            .iter()
            .copied()
            .find(|r| r.name() == wanted)
            .ok_or_else(|| SelectionError::invalid("city", s))
    }
}

// ============================================================================
// MONTH
// ============================================================================

/// Month selector: one of the six months covered by the data, or no filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonthFilter {
    All,
    January,
    February,
    March,
    April,
    May,
    June,
}

impl MonthFilter {
    pub const MONTHS: [MonthFilter; 6] = [
        MonthFilter::January,
        MonthFilter::February,
        MonthFilter::March,
        MonthFilter::April,
        MonthFilter::May,
        MonthFilter::June,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MonthFilter::All => "all",
            MonthFilter::January => "january",
            MonthFilter::February => "february",
            MonthFilter::March => "march",
            MonthFilter::April => "april",
            MonthFilter::May => "may",
            MonthFilter::June => "june",
        }
    }

    /// 1-based calendar index, None for "all"
    pub fn number(&self) -> Option<u32> {
        MonthFilter::MONTHS
            .iter()
            .position(|m| m == self)
            .map(|i| i as u32 + 1)
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MonthFilter {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        if wanted == "all" {
            return Ok(MonthFilter::All);
        }
        MonthFilter::MONTHS
            .iter()
            .copied()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| SelectionError::invalid("month", s))
    }
}

/// Full English month name for a 1-based calendar month
pub fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "January", "February", "March", "April", "May", "June", "July", "August",
        "September", "October", "November", "December",
    ];
    month
        .checked_sub(1)
        .and_then(|i| NAMES.get(i as usize))
        .copied()
        .unwrap_or("Unknown")
}

// ============================================================================
// WEEKDAY
// ============================================================================

/// Weekday selector, or no filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayFilter {
    All,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayFilter {
    pub const DAYS: [DayFilter; 7] = [
        DayFilter::Monday,
        DayFilter::Tuesday,
        DayFilter::Wednesday,
        DayFilter::Thursday,
        DayFilter::Friday,
        DayFilter::Saturday,
        DayFilter::Sunday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DayFilter::All => "all",
            DayFilter::Monday => "monday",
            DayFilter::Tuesday => "tuesday",
            DayFilter::Wednesday => "wednesday",
            DayFilter::Thursday => "thursday",
            DayFilter::Friday => "friday",
            DayFilter::Saturday => "saturday",
            DayFilter::Sunday => "sunday",
        }
    }

    /// Capitalized weekday name as stored on records, None for "all"
    pub fn title(&self) -> Option<&'static str> {
        match self {
            DayFilter::All => None,
            DayFilter::Monday => Some("Monday"),
            DayFilter::Tuesday => Some("Tuesday"),
            DayFilter::Wednesday => Some("Wednesday"),
            DayFilter::Thursday => Some("Thursday"),
            DayFilter::Friday => Some("Friday"),
            DayFilter::Saturday => Some("Saturday"),
            DayFilter::Sunday => Some("Sunday"),
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DayFilter {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        if wanted == "all" {
            return Ok(DayFilter::All);
        }
        DayFilter::DAYS
            .iter()
            .copied()
            .find(|d| d.name() == wanted)
            .ok_or_else(|| SelectionError::invalid("day", s))
    }
}

// ============================================================================
// FILTER SPEC
// ============================================================================

/// FilterSpec - region plus the two optional narrowing selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub region: Region,
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl FilterSpec {
    pub fn new(region: Region, month: MonthFilter, day: DayFilter) -> Self {
        FilterSpec { region, month, day }
    }

    /// Whole region, no narrowing
    pub fn unfiltered(region: Region) -> Self {
        FilterSpec::new(region, MonthFilter::All, DayFilter::All)
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (month: {}, day: {})", self.region, self.month, self.day)
    }
}
