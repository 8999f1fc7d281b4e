// Bikeshare Explorer - Core Library
// Exposes the load → filter → aggregate → page pipeline for the CLI and tests

pub mod selection;
pub mod trip;
pub mod filter;
pub mod stats;
pub mod paginator;
pub mod report;
pub mod prompt;

// Re-export commonly used types
pub use selection::{
    DayFilter, FilterSpec, MonthFilter, Region, SelectionError,
    month_name,
};
pub use trip::{
    Dataset, LoadError, Schema, TripRecord,
    load_csv, load_region, parse_timestamp,
};
pub use filter::apply_filters;
pub use stats::{
    BirthYearStats, DurationStats, StationStats, StatsSummary, TimeStats, UserStats,
    ValueCount, mode, value_counts,
};
pub use paginator::{Paginator, Window, WINDOW_SIZE};
pub use prompt::Session;
