// 🖨️ Report - human-readable statistics and raw-row windows

use crate::selection::{month_name, FilterSpec};
use crate::stats::{
    DurationStats, StationStats, StatsSummary, TimeStats, UserStats, ValueCount,
};
use crate::trip::{Schema, TripRecord};
use std::fmt::Write as _;
use std::io::{self, Write};
use std::time::Instant;

const NO_DATA: &str = "No data available.";

fn separator() -> String {
    "-".repeat(40)
}

fn or_no_data<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| NO_DATA.to_string())
}

/// Seconds as "N seconds (Hh Mm Ss)"
pub fn format_duration(seconds: f64) -> String {
    let whole = seconds.max(0.0).round() as u64;
    let (h, m, s) = (whole / 3600, (whole % 3600) / 60, whole % 60);
    format!("{seconds:.1} seconds ({h}h {m}m {s}s)")
}

fn format_counts(counts: &[ValueCount]) -> String {
    if counts.is_empty() {
        return format!("  {NO_DATA}\n");
    }
    let mut out = String::new();
    for c in counts {
        let _ = writeln!(out, "  {:<12} {}", c.value, c.count);
    }
    out
}

// ============================================================================
// SECTIONS
// ============================================================================

pub fn format_time_stats(stats: &TimeStats) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "The most common month is: {}",
        or_no_data(stats.common_month.map(month_name))
    );
    let _ = writeln!(
        out,
        "The most common day is: {}",
        or_no_data(stats.common_day.as_deref())
    );
    let _ = writeln!(
        out,
        "The most common start hour is: {}",
        or_no_data(stats.common_hour.map(|h| format!("{h:02}:00")))
    );
    out
}

pub fn format_station_stats(stats: &StationStats) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "The most common start station is: {}",
        or_no_data(stats.common_start.as_deref())
    );
    let _ = writeln!(
        out,
        "The most common end station is: {}",
        or_no_data(stats.common_end.as_deref())
    );
    let _ = writeln!(
        out,
        "The most common trip is: {}",
        or_no_data(stats.common_trip.as_deref())
    );
    out
}

pub fn format_duration_stats(stats: &DurationStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "The total travel time is: {}", format_duration(stats.total));
    let _ = writeln!(
        out,
        "The mean travel time is: {}",
        or_no_data(stats.mean.map(format_duration))
    );
    out
}

pub fn format_user_stats(stats: &UserStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "The counts of user types are:");
    out.push_str(&format_counts(&stats.user_types));

    match &stats.gender {
        Some(counts) => {
            let _ = writeln!(out, "The counts of gender are:");
            out.push_str(&format_counts(counts));
        }
        None => {
            let _ = writeln!(out, "There is no gender data available for this city.");
        }
    }

    match &stats.birth_year {
        Some(years) => {
            let _ = writeln!(out, "The earliest birth year is: {}", years.earliest);
            let _ = writeln!(out, "The most recent birth year is: {}", years.most_recent);
            let _ = writeln!(out, "The most common birth year is: {}", years.most_common);
        }
        None => {
            let _ = writeln!(out, "There is no birth year data available for this city.");
        }
    }
    out
}

/// Run `compute`, print its section with a heading and elapsed time
fn timed_section<W: Write, T>(
    out: &mut W,
    heading: &str,
    compute: impl FnOnce() -> T,
    render: impl FnOnce(&T) -> String,
) -> io::Result<T> {
    writeln!(out, "\n{heading}\n")?;
    let started = Instant::now();
    let value = compute();
    write!(out, "{}", render(&value))?;
    writeln!(out, "\nThis took {:.6} seconds.", started.elapsed().as_secs_f64())?;
    writeln!(out, "{}", separator())?;
    Ok(value)
}

/// Compute and print all four statistics sections, returning the summary
pub fn print_statistics<W: Write>(
    out: &mut W,
    records: &[TripRecord],
    schema: Schema,
) -> io::Result<StatsSummary> {
    let time = timed_section(
        out,
        "Calculating The Most Frequent Times of Travel...",
        || TimeStats::compute(records),
        format_time_stats,
    )?;
    let stations = timed_section(
        out,
        "Calculating The Most Popular Stations and Trip...",
        || StationStats::compute(records),
        format_station_stats,
    )?;
    let duration = timed_section(
        out,
        "Calculating Trip Duration...",
        || DurationStats::compute(records),
        format_duration_stats,
    )?;
    let users = timed_section(
        out,
        "Calculating User Stats...",
        || UserStats::compute(records, schema),
        format_user_stats,
    )?;

    Ok(StatsSummary {
        trip_count: records.len(),
        time,
        stations,
        duration,
        users,
    })
}

/// JSON body printed by `summary --json`
pub fn summary_json(spec: &FilterSpec, summary: &StatsSummary) -> serde_json::Result<serde_json::Value> {
    Ok(serde_json::json!({
        "filter": serde_json::to_value(spec)?,
        "summary": serde_json::to_value(summary)?,
    }))
}

/// Whole summary as text, without timings (one-shot mode)
pub fn format_summary(summary: &StatsSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Trips: {}", summary.trip_count);
    for section in [
        format_time_stats(&summary.time),
        format_station_stats(&summary.stations),
        format_duration_stats(&summary.duration),
        format_user_stats(&summary.users),
    ] {
        let _ = writeln!(out, "{}", separator());
        out.push_str(&section);
    }
    out
}

// ============================================================================
// RAW ROWS
// ============================================================================

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Column values for one record, shared with the full-screen browser
pub fn row_cells(index: usize, trip: &TripRecord) -> [String; 9] {
    [
        index.to_string(),
        trip.start_time.format("%Y-%m-%d %H:%M:%S").to_string(),
        trip.end_time
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        trip.trip_duration
            .map(|d| format!("{d:.0}"))
            .unwrap_or_default(),
        truncate(&trip.start_station, 30),
        truncate(&trip.end_station, 30),
        trip.user_type.clone().unwrap_or_default(),
        trip.gender.clone().unwrap_or_default(),
        trip.birth_year.map(|y| y.to_string()).unwrap_or_default(),
    ]
}

pub const ROW_HEADERS: [&str; 9] = [
    "#",
    "Start Time",
    "End Time",
    "Duration",
    "Start Station",
    "End Station",
    "User Type",
    "Gender",
    "Birth Year",
];

/// Render a window of raw rows as an aligned text table
pub fn format_window(start: usize, rows: &[TripRecord]) -> String {
    let widths: [usize; 9] = [6, 19, 19, 8, 30, 30, 10, 6, 10];

    let mut out = String::new();
    let header: Vec<String> = ROW_HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{h:<w$}"))
        .collect();
    let _ = writeln!(out, "{}", header.join(" ").trim_end());

    for (offset, trip) in rows.iter().enumerate() {
        let line: Vec<String> = row_cells(start + offset, trip)
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{c:<w$}"))
            .collect();
        let _ = writeln!(out, "{}", line.join(" ").trim_end());
    }
    out
}
