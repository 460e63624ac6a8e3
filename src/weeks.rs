use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::TimesheetRecord;

/// Inclusive Monday..Sunday range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekWindow {
    /// The Monday-start week that contains `today`.
    pub fn current(today: NaiveDate) -> Self {
        let start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    /// The seven days immediately after this window.
    pub fn following(&self) -> Self {
        let start = self.end + Duration::days(1);
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Records dated inside the window, in input order.
    pub fn select<'a>(&self, records: &'a [TimesheetRecord]) -> Vec<&'a TimesheetRecord> {
        records.iter().filter(|r| self.contains(r.date)).collect()
    }
}

impl fmt::Display for WeekWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Current and next week relative to `today`.
pub fn week_ranges(today: NaiveDate) -> (WeekWindow, WeekWindow) {
    let current = WeekWindow::current(today);
    (current, current.following())
}
