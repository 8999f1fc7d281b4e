// 📊 Aggregator - descriptive statistics over filtered trips
//
// Mode ties resolve to the smallest value in natural order, so the same
// input always reports the same answer. Empty input never fails: modes
// come back as None and totals as zero.

use crate::trip::{Schema, TripRecord};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

// ============================================================================
// HELPERS
// ============================================================================

/// Most frequent value; ties go to the smallest value
pub fn mode<T, I>(values: I) -> Option<T>
where
    T: Ord,
    I: IntoIterator<Item = T>,
{
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut best: Option<(T, usize)> = None;
    for (value, count) in counts {
        // Strictly greater: the first (smallest) of equal counts is kept
        if best.as_ref().map_or(true, |(_, top)| count > *top) {
            best = Some((value, count));
        }
    }

    best.map(|(value, _)| value)
}

/// One row of a frequency table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Frequency table, most common first (name breaks ties)
pub fn value_counts<'a, I>(values: I) -> Vec<ValueCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut result: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, count)| ValueCount {
            value: value.to_string(),
            count,
        })
        .collect();

    result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    result
}

// ============================================================================
// SECTIONS
// ============================================================================

/// Most frequent times of travel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    pub common_month: Option<u32>,
    pub common_day: Option<String>,
    pub common_hour: Option<u32>,
}

impl TimeStats {
    pub fn compute(records: &[TripRecord]) -> Self {
        TimeStats {
            common_month: mode(records.iter().map(|r| r.month)),
            common_day: mode(records.iter().map(|r| r.weekday.as_str())).map(str::to_string),
            common_hour: mode(records.iter().map(|r| r.hour)),
        }
    }
}

/// Most popular stations and trip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub common_start: Option<String>,
    pub common_end: Option<String>,
    pub common_trip: Option<String>,
}

impl StationStats {
    pub fn compute(records: &[TripRecord]) -> Self {
        // Blank station cells are left out, like blank demographics
        let starts = records.iter().map(|r| r.start_station.as_str());
        let ends = records.iter().map(|r| r.end_station.as_str());

        StationStats {
            common_start: mode(starts.filter(|s| !s.is_empty())).map(str::to_string),
            common_end: mode(ends.filter(|s| !s.is_empty())).map(str::to_string),
            common_trip: mode(records.iter().filter_map(|r| r.station_pair())),
        }
    }
}

/// Total and average trip duration, in seconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub total: f64,
    pub mean: Option<f64>,
}

impl DurationStats {
    pub fn compute(records: &[TripRecord]) -> Self {
        // Blank durations are skipped by both the sum and the mean
        let durations: Vec<f64> = records.iter().filter_map(|r| r.trip_duration).collect();
        let total: f64 = durations.iter().sum();
        let mean = if durations.is_empty() {
            None
        } else {
            Some(total / durations.len() as f64)
        };

        DurationStats { total, mean }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: i32,
}

/// User demographics.
///
/// `gender` is None when the region has no gender column; `birth_year` is
/// None when the column is absent or every filtered trip left it blank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub user_types: Vec<ValueCount>,
    pub gender: Option<Vec<ValueCount>>,
    pub birth_year: Option<BirthYearStats>,
}

impl UserStats {
    pub fn compute(records: &[TripRecord], schema: Schema) -> Self {
        let user_types = value_counts(records.iter().filter_map(|r| r.user_type.as_deref()));

        let gender = schema
            .has_gender
            .then(|| value_counts(records.iter().filter_map(|r| r.gender.as_deref())));

        let birth_year = if schema.has_birth_year {
            let years: Vec<i32> = records.iter().filter_map(|r| r.birth_year).collect();
            match (years.iter().min(), years.iter().max(), mode(years.iter().copied())) {
                (Some(&earliest), Some(&most_recent), Some(most_common)) => Some(BirthYearStats {
                    earliest,
                    most_recent,
                    most_common,
                }),
                _ => None,
            }
        } else {
            None
        };

        UserStats {
            user_types,
            gender,
            birth_year,
        }
    }
}

// ============================================================================
// SUMMARY
// ============================================================================

/// Everything reported for one filtered dataset. Computed fresh, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    pub trip_count: usize,
    pub time: TimeStats,
    pub stations: StationStats,
    pub duration: DurationStats,
    pub users: UserStats,
}

impl StatsSummary {
    pub fn compute(records: &[TripRecord], schema: Schema) -> Self {
        StatsSummary {
            trip_count: records.len(),
            time: TimeStats::compute(records),
            stations: StationStats::compute(records),
            duration: DurationStats::compute(records),
            users: UserStats::compute(records, schema),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.trip_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::apply_filters;
    use crate::selection::{DayFilter, MonthFilter};
    use crate::trip::parse_timestamp;

    const FULL_SCHEMA: Schema = Schema {
        has_gender: true,
        has_birth_year: true,
    };

    fn trip(ts: &str, start: &str, end: &str, duration: f64) -> TripRecord {
        TripRecord::new(parse_timestamp(ts).unwrap(), start, end, duration)
    }

    fn sample() -> Vec<TripRecord> {
        vec![
            trip("2017-06-23 15:09:32", "Canal St", "Clark St", 300.0)
                .with_user_type("Subscriber")
                .with_gender("Male")
                .with_birth_year(1992),
            trip("2017-06-24 15:40:00", "Canal St", "Clark St", 600.0)
                .with_user_type("Subscriber")
                .with_gender("Female")
                .with_birth_year(1985),
            trip("2017-05-25 08:19:03", "Lake Shore", "Canal St", 900.0)
                .with_user_type("Customer")
                .with_gender("Female")
                .with_birth_year(1992),
            trip("2017-06-01 15:00:00", "Lake Shore", "Clark St", 200.0)
                .with_user_type("Subscriber")
                .with_birth_year(1960),
        ]
    }

    #[test]
    fn test_mode_picks_most_frequent() {
        assert_eq!(mode(vec![3, 1, 3, 2]), Some(3));
        assert_eq!(mode(vec!["b", "a", "b"]), Some("b"));
    }

    #[test]
    fn test_mode_tie_breaks_to_smallest() {
        assert_eq!(mode(vec![5, 2, 5, 2, 9]), Some(2));
        assert_eq!(mode(vec!["Monday", "Friday"]), Some("Friday"));
    }

    #[test]
    fn test_mode_of_empty_is_none() {
        assert_eq!(mode(Vec::<u32>::new()), None);
    }

    #[test]
    fn test_value_counts_sorted_by_count() {
        let counts = value_counts(vec!["Customer", "Subscriber", "Subscriber", "Dependent"]);
        let flat: Vec<(&str, usize)> = counts.iter().map(|c| (c.value.as_str(), c.count)).collect();
        assert_eq!(flat, vec![("Subscriber", 2), ("Customer", 1), ("Dependent", 1)]);
    }

    #[test]
    fn test_time_stats() {
        let stats = TimeStats::compute(&sample());
        assert_eq!(stats.common_month, Some(6));
        assert_eq!(stats.common_hour, Some(15));
        // One trip on each of Friday, Saturday, Thursday, Thursday
        assert_eq!(stats.common_day.as_deref(), Some("Thursday"));
    }

    #[test]
    fn test_station_stats() {
        let stats = StationStats::compute(&sample());
        // Canal St and Lake Shore tie at 2 starts
        assert_eq!(stats.common_start.as_deref(), Some("Canal St"));
        assert_eq!(stats.common_end.as_deref(), Some("Clark St"));
        assert_eq!(stats.common_trip.as_deref(), Some("Canal St to Clark St"));
    }

    #[test]
    fn test_blank_stations_are_not_counted() {
        let records = vec![
            trip("2017-06-01 08:00:00", "", "B", 60.0),
            trip("2017-06-01 09:00:00", "", "B", 60.0),
            trip("2017-06-01 10:00:00", "A", "B", 60.0),
        ];
        let stats = StationStats::compute(&records);

        assert_eq!(stats.common_start.as_deref(), Some("A"));
        assert_eq!(stats.common_end.as_deref(), Some("B"));
        assert_eq!(stats.common_trip.as_deref(), Some("A to B"));
    }

    #[test]
    fn test_all_blank_stations_report_no_data() {
        let records = vec![trip("2017-06-01 08:00:00", "", "", 60.0)];
        let stats = StationStats::compute(&records);
        assert_eq!(stats.common_start, None);
        assert_eq!(stats.common_trip, None);
    }

    #[test]
    fn test_blank_durations_are_skipped() {
        let mut records = sample();
        records[3].trip_duration = None;
        let stats = DurationStats::compute(&records);
        assert_eq!(stats.total, 1800.0);
        assert_eq!(stats.mean, Some(600.0), "mean over the three known durations");

        for r in records.iter_mut() {
            r.trip_duration = None;
        }
        let stats = DurationStats::compute(&records);
        assert_eq!(stats.total, 0.0);
        assert_eq!(stats.mean, None);
    }

    #[test]
    fn test_duration_stats() {
        let stats = DurationStats::compute(&sample());
        assert_eq!(stats.total, 2000.0);
        assert_eq!(stats.mean, Some(500.0));
    }

    #[test]
    fn test_user_stats_with_full_schema() {
        let stats = UserStats::compute(&sample(), FULL_SCHEMA);

        assert_eq!(stats.user_types[0].value, "Subscriber");
        assert_eq!(stats.user_types[0].count, 3);

        let gender = stats.gender.expect("gender column present");
        assert_eq!(gender[0].value, "Female");
        assert_eq!(gender[0].count, 2);
        assert_eq!(gender.len(), 2, "blank gender is not counted");

        let years = stats.birth_year.expect("birth years present");
        assert_eq!(years.earliest, 1960);
        assert_eq!(years.most_recent, 1992);
        assert_eq!(years.most_common, 1992);
    }

    #[test]
    fn test_user_stats_without_optional_columns() {
        let stats = UserStats::compute(&sample(), Schema::default());
        assert!(stats.gender.is_none());
        assert!(stats.birth_year.is_none());
        assert!(!stats.user_types.is_empty());
    }

    #[test]
    fn test_empty_input_reports_no_data() {
        let summary = StatsSummary::compute(&[], FULL_SCHEMA);

        assert!(summary.is_empty());
        assert_eq!(summary.time.common_month, None);
        assert_eq!(summary.stations.common_trip, None);
        assert_eq!(summary.duration.total, 0.0);
        assert_eq!(summary.duration.mean, None);
        assert!(summary.users.user_types.is_empty());
        assert_eq!(summary.users.gender, Some(Vec::new()));
        assert_eq!(summary.users.birth_year, None);
    }

    #[test]
    fn test_mode_month_matches_month_filter() {
        let records = sample();
        for month in MonthFilter::MONTHS {
            let filtered = apply_filters(&records, month, DayFilter::All);
            if filtered.is_empty() {
                continue;
            }
            let stats = TimeStats::compute(&filtered);
            assert_eq!(stats.common_month, month.number(), "month {month}");
        }
    }
}
