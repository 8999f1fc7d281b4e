// 📄 Paginator - fixed-size windows over filtered trips

use crate::trip::TripRecord;
use log::debug;

/// Rows per window
pub const WINDOW_SIZE: usize = 5;

/// Result of asking for the next window
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Window<'a> {
    /// `start` is the zero-based position of `rows[0]` in the record sequence
    Rows { start: usize, rows: &'a [TripRecord] },
    Exhausted,
}

/// Cursor over a record slice, handing out at most WINDOW_SIZE rows at a time
#[derive(Debug, Clone)]
pub struct Paginator<'a> {
    records: &'a [TripRecord],
    cursor: usize,
}

impl<'a> Paginator<'a> {
    pub fn new(records: &'a [TripRecord]) -> Self {
        Self::with_cursor(records, 0)
    }

    /// Start from an arbitrary zero-based position
    pub fn with_cursor(records: &'a [TripRecord], cursor: usize) -> Self {
        Paginator { records, cursor }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    /// True once the cursor has reached (or passed) the end
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.records.len()
    }

    /// Hand out the next window and advance, or report exhaustion
    pub fn next_window(&mut self) -> Window<'a> {
        if self.is_exhausted() {
            debug!("Paginator exhausted at {}/{}", self.cursor, self.records.len());
            return Window::Exhausted;
        }

        let start = self.cursor;
        let end = (start + WINDOW_SIZE).min(self.records.len());
        self.cursor = end;

        Window::Rows {
            start,
            rows: &self.records[start..end],
        }
    }

    /// Go back to the first window
    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

impl<'a> Iterator for Paginator<'a> {
    type Item = &'a [TripRecord];

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_window() {
            Window::Rows { rows, .. } => Some(rows),
            Window::Exhausted => None,
        }
    }
}
