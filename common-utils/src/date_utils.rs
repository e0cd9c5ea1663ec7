//! # Date utilities
//!
//! This module yields the date window an extraction run asks the upstream API for.
//! Both bounds are strings of the form `YYYY-MM-DD HH:MM:SS`.
//!

use chrono::{Duration, NaiveDate, Utc};

/// How many calendar days before the run date the requested day lies.
pub const LOOKBACK_DAYS: i64 = 3;

const DAY_FORMAT: &str = "%Y-%m-%d";
const START_OF_DAY: &str = "00:00:00";
const END_OF_DAY: &str = "23:59:59";

/// Produces today's date in UTC.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// A single calendar day, expressed as an inclusive start and end timestamp.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct DateWindow {
    start_date: String,
    end_date: String,
}

impl DateWindow {
    /// The whole of the given calendar day: midnight up to 23:59:59.
    pub fn for_day(day: NaiveDate) -> Self {
        let day_ymd = day.format(DAY_FORMAT).to_string();
        Self {
            start_date: format!("{} {}", day_ymd, START_OF_DAY),
            end_date: format!("{} {}", day_ymd, END_OF_DAY),
        }
    }

    /// The day lying [`LOOKBACK_DAYS`] calendar days before `run_date`.
    pub fn days_before(run_date: NaiveDate) -> Self {
        Self::for_day(run_date - Duration::days(LOOKBACK_DAYS))
    }

    /// The window for a run started now.
    pub fn for_run() -> Self {
        Self::days_before(today_utc())
    }

    pub fn start_date(&self) -> &str {
        &self.start_date
    }

    pub fn end_date(&self) -> &str {
        &self.end_date
    }
}
