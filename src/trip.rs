// 🚲 Record Source - trip CSV → TripRecord
// One flat file per region, derived time fields computed once at load

use crate::selection::{FilterSpec, Region};
use chrono::{Datelike, NaiveDateTime, Timelike};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Accepted start/end timestamp layouts (fraction is optional in both)
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

const REQUIRED_COLUMNS: [&str; 6] = [
    "Start Time",
    "End Time",
    "Trip Duration",
    "Start Station",
    "End Station",
    "User Type",
];

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open dataset {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("dataset {} is missing required column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("malformed row at line {line} of {}", .path.display())]
    Csv {
        path: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("unparseable {field} '{value}' at line {line}")]
    Timestamp {
        field: &'static str,
        value: String,
        line: u64,
    },
}

// ============================================================================
// RAW ROW
// ============================================================================

/// Row exactly as it appears in the CSV. Unknown columns are ignored.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,

    #[serde(rename = "End Time", default)]
    end_time: Option<String>,

    #[serde(rename = "Trip Duration", default)]
    trip_duration: Option<f64>,

    #[serde(rename = "Start Station", default)]
    start_station: Option<String>,

    #[serde(rename = "End Station", default)]
    end_station: Option<String>,

    #[serde(rename = "User Type", default)]
    user_type: Option<String>,

    #[serde(rename = "Gender", default)]
    gender: Option<String>,

    // Stored as a float ("1989.0") wherever the column exists
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

// ============================================================================
// CORE TYPES
// ============================================================================

/// TripRecord - one bike-share trip with derived calendar fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    /// Empty when the cell was blank
    pub start_station: String,
    pub end_station: String,
    /// Seconds, None when the cell was blank
    pub trip_duration: Option<f64>,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,

    // Derived from start_time
    pub month: u32,
    pub weekday: String,
    pub hour: u32,
}

impl TripRecord {
    /// Build a record and derive month/weekday/hour from the start time
    pub fn new(
        start_time: NaiveDateTime,
        start_station: &str,
        end_station: &str,
        trip_duration: f64,
    ) -> Self {
        TripRecord {
            start_time,
            end_time: None,
            start_station: start_station.to_string(),
            end_station: end_station.to_string(),
            trip_duration: Some(trip_duration),
            user_type: None,
            gender: None,
            birth_year: None,
            month: start_time.month(),
            weekday: start_time.format("%A").to_string(),
            hour: start_time.hour(),
        }
    }

    /// Builder pattern: add end time
    pub fn with_end_time(mut self, end_time: NaiveDateTime) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Builder pattern: add user type
    pub fn with_user_type(mut self, user_type: &str) -> Self {
        self.user_type = Some(user_type.to_string());
        self
    }

    /// Builder pattern: add gender
    pub fn with_gender(mut self, gender: &str) -> Self {
        self.gender = Some(gender.to_string());
        self
    }

    /// Builder pattern: add birth year
    pub fn with_birth_year(mut self, year: i32) -> Self {
        self.birth_year = Some(year);
        self
    }

    /// "Start to End" key used for station-pair frequency, None if either side is blank
    pub fn station_pair(&self) -> Option<String> {
        if self.start_station.is_empty() || self.end_station.is_empty() {
            return None;
        }
        Some(format!("{} to {}", self.start_station, self.end_station))
    }

    fn from_raw(raw: RawTrip, line: u64) -> Result<Self, LoadError> {
        let start_time = parse_timestamp(&raw.start_time).ok_or_else(|| LoadError::Timestamp {
            field: "Start Time",
            value: raw.start_time.clone(),
            line,
        })?;

        let end_time = match non_blank(raw.end_time) {
            Some(value) => Some(parse_timestamp(&value).ok_or(LoadError::Timestamp {
                field: "End Time",
                value,
                line,
            })?),
            None => None,
        };

        let mut record = TripRecord::new(
            start_time,
            &non_blank(raw.start_station).unwrap_or_default(),
            &non_blank(raw.end_station).unwrap_or_default(),
            0.0,
        );
        record.trip_duration = raw.trip_duration.filter(|d| d.is_finite());
        record.end_time = end_time;
        record.user_type = non_blank(raw.user_type);
        record.gender = non_blank(raw.gender);
        record.birth_year = raw.birth_year.filter(|y| y.is_finite()).map(|y| y as i32);

        Ok(record)
    }
}

/// Parse a trip timestamp in any accepted layout
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// ============================================================================
// DATASET
// ============================================================================

/// Which optional columns the region's file carries (checked once per load)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Schema {
    pub has_gender: bool,
    pub has_birth_year: bool,
}

impl Schema {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        Schema {
            has_gender: headers.iter().any(|h| h.trim() == "Gender"),
            has_birth_year: headers.iter().any(|h| h.trim() == "Birth Year"),
        }
    }
}

/// All trips of one region, in file order
#[derive(Debug, Clone)]
pub struct Dataset {
    pub region: Region,
    pub schema: Schema,
    pub records: Vec<TripRecord>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Apply the month/day selectors of a FilterSpec
    pub fn filtered(&self, spec: &FilterSpec) -> Vec<TripRecord> {
        crate::filter::apply_filters(&self.records, spec.month, spec.day)
    }
}

/// Load the dataset for a region from `data_dir`
pub fn load_region(data_dir: &Path, region: Region) -> Result<Dataset, LoadError> {
    let path = data_dir.join(region.file_name());
    load_csv(&path, region)
}

/// Load a trip CSV file
pub fn load_csv(path: &Path, region: Region) -> Result<Dataset, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let headers = rdr
        .headers()
        .map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    if let Some(column) = REQUIRED_COLUMNS
        .iter()
        .find(|c| !headers.iter().any(|h| h.trim() == **c))
    {
        return Err(LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        });
    }

    let schema = Schema::from_headers(&headers);
    debug!("{}: schema {:?}", path.display(), schema);

    let mut records = Vec::new();
    for (i, result) in rdr.deserialize::<RawTrip>().enumerate() {
        // Header is line 1
        let line = i as u64 + 2;
        let raw = result.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            line,
            source,
        })?;
        records.push(TripRecord::from_raw(raw, line)?);
    }

    info!("Loaded {} trips for {} from {}", records.len(), region, path.display());

    Ok(Dataset {
        region,
        schema,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    const CHICAGO: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1423854,2017-06-23 15:09:32,2017-06-23 15:14:53,321,Wood St & Hubbard St,Damen Ave & Chicago Ave,Subscriber,Male,1992.0
955915,2017-05-25 18:19:03,2017-05-25 18:45:53,1610,Theater on the Lake,Sheffield Ave & Waveland Ave,Subscriber,Female,1992.0
9031,2017-01-04 08:27:49,2017-01-04 08:34:45,416,May St & Taylor St,Wood St & Taylor St,Customer,,
";

    const WASHINGTON: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
1621326,2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,14th & Belmont St NW,15th & K St NW,Subscriber
";

    #[test]
    fn test_load_region_with_optional_columns() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "chicago.csv", CHICAGO);

        let dataset = load_region(dir.path(), Region::Chicago).unwrap();

        assert_eq!(dataset.len(), 3);
        assert!(dataset.schema.has_gender);
        assert!(dataset.schema.has_birth_year);

        let first = &dataset.records[0];
        assert_eq!(first.start_station, "Wood St & Hubbard St");
        assert_eq!(first.trip_duration, Some(321.0));
        assert_eq!(first.month, 6);
        assert_eq!(first.weekday, "Friday");
        assert_eq!(first.hour, 15);
        assert_eq!(first.gender.as_deref(), Some("Male"));
        assert_eq!(first.birth_year, Some(1992));
        assert!(first.end_time.is_some());

        // Blank optional cells become None
        let third = &dataset.records[2];
        assert_eq!(third.gender, None);
        assert_eq!(third.birth_year, None);
        assert_eq!(third.user_type.as_deref(), Some("Customer"));
    }

    #[test]
    fn test_load_region_without_optional_columns() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "washington.csv", WASHINGTON);

        let dataset = load_region(dir.path(), Region::Washington).unwrap();

        assert_eq!(dataset.len(), 1);
        assert!(!dataset.schema.has_gender, "Washington has no gender column");
        assert!(!dataset.schema.has_birth_year);
        assert_eq!(dataset.records[0].trip_duration, Some(489.066));
        assert_eq!(dataset.records[0].weekday, "Wednesday");
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let dir = TempDir::new().unwrap();
        let err = load_region(dir.path(), Region::NewYorkCity).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }), "got {err:?}");
        assert!(err.to_string().contains("new_york_city.csv"));
    }

    #[test]
    fn test_bad_timestamp_reports_line() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "chicago.csv",
            "Start Time,End Time,Trip Duration,Start Station,End Station,User Type\n\
             2017-06-23 15:09:32,,300,A,B,Subscriber\n\
             yesterday,,300,A,B,Subscriber\n",
        );

        let err = load_csv(&path, Region::Chicago).unwrap_err();
        match err {
            LoadError::Timestamp { field, value, line } => {
                assert_eq!(field, "Start Time");
                assert_eq!(value, "yesterday");
                assert_eq!(line, 3);
            }
            other => panic!("expected timestamp error, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_cells_load_as_missing() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "chicago.csv",
            "Start Time,End Time,Trip Duration,Start Station,End Station,User Type\n\
             2017-06-23 15:09:32,,300,A,B,Subscriber\n\
             2017-06-23 16:00:00,,,  ,B,Subscriber\n",
        );

        let dataset = load_csv(&path, Region::Chicago).unwrap();

        assert_eq!(dataset.len(), 2, "blank duration must not abort the load");
        let blank = &dataset.records[1];
        assert_eq!(blank.trip_duration, None);
        assert_eq!(blank.start_station, "");
        assert_eq!(blank.station_pair(), None);
    }

    #[test]
    fn test_non_numeric_duration_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "chicago.csv",
            "Start Time,End Time,Trip Duration,Start Station,End Station,User Type\n\
             2017-06-23 15:09:32,,ten minutes,A,B,Subscriber\n",
        );

        let err = load_csv(&path, Region::Chicago).unwrap_err();
        assert!(matches!(err, LoadError::Csv { line: 2, .. }), "got {err:?}");
    }

    #[test]
    fn test_missing_required_column() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "chicago.csv",
            "Start Time,End Time,Start Station,End Station,User Type\n",
        );

        let err = load_csv(&path, Region::Chicago).unwrap_err();
        match err {
            LoadError::MissingColumn { column, .. } => assert_eq!(column, "Trip Duration"),
            other => panic!("expected missing column, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_timestamp_layouts() {
        assert!(parse_timestamp("2017-01-01 00:07:57").is_some());
        assert!(parse_timestamp("2017-01-01 00:07:57.123").is_some());
        assert!(parse_timestamp("2017-01-01T00:07:57").is_some());
        assert!(parse_timestamp("01/01/2017").is_none());
    }

    #[test]
    fn test_station_pair_key() {
        let ts = parse_timestamp("2017-03-05 10:00:00").unwrap();
        let end = parse_timestamp("2017-03-05 10:01:00").unwrap();
        let trip = TripRecord::new(ts, "Canal St", "Clark St", 60.0).with_end_time(end);
        assert_eq!(trip.station_pair().as_deref(), Some("Canal St to Clark St"));
        assert_eq!(trip.end_time, Some(end));
        assert_eq!(trip.weekday, "Sunday");
    }
}
