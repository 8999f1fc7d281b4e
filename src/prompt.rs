// 💬 Prompt Loop - validated input driving load → filter → report → pager
//
// Generic over the reader/writer so sessions can be scripted in tests.

use crate::paginator::{Paginator, Window, WINDOW_SIZE};
use crate::report::{format_window, print_statistics};
use crate::selection::{DayFilter, FilterSpec, MonthFilter, Region};
use crate::trip::{load_region, TripRecord};
use anyhow::{bail, Context, Result};
use log::{info, warn};
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub struct Session<R, W> {
    input: R,
    output: W,
    data_dir: PathBuf,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, data_dir: &Path) -> Self {
        Session {
            input,
            output,
            data_dir: data_dir.to_path_buf(),
        }
    }

    /// Hand back the writer (used by tests to inspect the transcript)
    pub fn into_output(self) -> W {
        self.output
    }

    /// Read one line; None at end of input
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .context("Failed to read from input")?;
        Ok((n > 0).then_some(line))
    }

    /// Re-prompt until the answer parses as a `T`
    pub fn get_valid_input<T>(&mut self, prompt: &str, invalid_message: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        loop {
            let Some(line) = self.read_line(prompt)? else {
                bail!("input closed while waiting for: {}", prompt.trim());
            };

            match line.parse::<T>() {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!("Rejected selection: {e}");
                    writeln!(self.output, "{invalid_message}")?;
                }
            }
        }
    }

    /// Only "yes" (any case) counts as yes. End of input is a no.
    pub fn ask_yes_no(&mut self, prompt: &str) -> Result<bool> {
        Ok(self
            .read_line(prompt)?
            .map(|answer| answer.trim().eq_ignore_ascii_case("yes"))
            .unwrap_or(false))
    }

    /// Collect region, month and day
    pub fn get_filters(&mut self) -> Result<FilterSpec> {
        writeln!(self.output, "Hello! Let's explore some US bikeshare data!")?;

        let region: Region = self.get_valid_input(
            "Please enter the city name (chicago, new york city, washington): ",
            "Invalid city name. Please enter a valid city name.",
        )?;
        let month: MonthFilter = self.get_valid_input(
            "Please enter the month name (january ... june, or all): ",
            "Invalid month name. Please enter a valid month name.",
        )?;
        let day: DayFilter = self.get_valid_input(
            "Please enter the day name (monday ... sunday, or all): ",
            "Invalid day name. Please enter a valid day name.",
        )?;

        writeln!(self.output, "{}", "-".repeat(40))?;
        Ok(FilterSpec::new(region, month, day))
    }

    /// Show raw rows five at a time for as long as the user asks
    pub fn display_data(&mut self, records: &[TripRecord]) -> Result<()> {
        let mut pages = Paginator::new(records);
        let prompt = format!("Do you want to see the next {WINDOW_SIZE} rows of data? (yes/no): ");

        while self.ask_yes_no(&prompt)? {
            match pages.next_window() {
                Window::Rows { start, rows } => {
                    write!(self.output, "{}", format_window(start, rows))?;
                    if pages.is_exhausted() {
                        writeln!(self.output, "No more data to display.")?;
                        break;
                    }
                }
                Window::Exhausted => {
                    writeln!(self.output, "No more data to display.")?;
                    break;
                }
            }
        }

        Ok(())
    }

    /// One pass: prompt, load, filter, report, page
    pub fn run_once(&mut self) -> Result<FilterSpec> {
        let spec = self.get_filters()?;
        info!("Exploring {spec}");

        let dataset = load_region(&self.data_dir, spec.region)
            .with_context(|| format!("Failed to load data for {}", spec.region))?;
        let records = dataset.filtered(&spec);

        if records.is_empty() {
            writeln!(self.output, "\nNo trips match {spec}.")?;
        }

        print_statistics(&mut self.output, &records, dataset.schema)?;
        self.display_data(&records)?;

        Ok(spec)
    }

    /// Repeat until the user declines to restart
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.run_once()?;
            if !self.ask_yes_no("\nWould you like to restart? Enter yes or no.\n")? {
                break;
            }
        }
        Ok(())
    }
}
