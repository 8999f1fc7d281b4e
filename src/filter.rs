// 🔎 Filter Stage - narrow trips by month and weekday

use crate::selection::{DayFilter, MonthFilter};
use crate::trip::TripRecord;
use log::debug;

/// Check a single record against both selectors
pub fn matches(record: &TripRecord, month: MonthFilter, day: DayFilter) -> bool {
    if let Some(number) = month.number() {
        if record.month != number {
            return false;
        }
    }

    if let Some(title) = day.title() {
        if record.weekday != title {
            return false;
        }
    }

    true
}

/// Order-preserving subsequence of `records` that passes both selectors.
///
/// `MonthFilter::All` / `DayFilter::All` disable that side of the filter.
/// An empty result is valid.
pub fn apply_filters(records: &[TripRecord], month: MonthFilter, day: DayFilter) -> Vec<TripRecord> {
    let filtered: Vec<TripRecord> = records
        .iter()
        .filter(|r| matches(r, month, day))
        .cloned()
        .collect();

    debug!(
        "Filter month={} day={}: {} of {} trips kept",
        month,
        day,
        filtered.len(),
        records.len()
    );

    filtered
}
