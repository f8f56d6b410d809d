//! Calendar-month windows used by reports and the dashboard.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::{EngineError, ResultEngine};

/// Half-open window `[start, end)` covering one calendar month, in UTC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MonthWindow {
    pub year: i32,
    pub month: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthWindow {
    /// Builds the window for `month` (1-12) of `year`.
    ///
    /// December ends on January 1st of the following year.
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::Validation(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        let (end_year, end_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        Ok(Self {
            year,
            month,
            start: first_instant(year, month)?,
            end: first_instant(end_year, end_month)?,
        })
    }

    /// The month containing `instant`.
    pub fn containing(instant: DateTime<Utc>) -> ResultEngine<Self> {
        Self::new(instant.year(), instant.month())
    }

    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// `MM/YYYY`, as printed in report titles.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{:02}/{}", self.month, self.year)
    }
}

fn first_instant(year: i32, month: u32) -> ResultEngine<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| EngineError::Validation(format!("invalid month {year}-{month:02}")))
}

/// Midnight UTC of `date`; operator-entered dates are stored this way.
#[must_use]
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn regular_month_ends_on_first_of_next_month() {
        let window = MonthWindow::new(2025, 3).unwrap();
        assert_eq!(
            window.start,
            Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            window.end,
            Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn december_rolls_over_to_january_of_next_year() {
        let window = MonthWindow::new(2024, 12).unwrap();
        assert_eq!(
            window.start,
            Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            window.end,
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn out_of_range_month_is_rejected() {
        assert!(matches!(
            MonthWindow::new(2024, 13),
            Err(EngineError::Validation(_))
        ));
        assert!(MonthWindow::new(2024, 0).is_err());
    }

    #[test]
    fn window_is_half_open() {
        let window = MonthWindow::new(2025, 1).unwrap();
        assert!(window.contains(window.start));
        assert!(!window.contains(window.end));
        assert!(window.contains(Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 59).unwrap()));
    }

    #[test]
    fn containing_picks_the_calendar_month() {
        let now = Utc.with_ymd_and_hms(2025, 2, 17, 10, 30, 0).unwrap();
        let window = MonthWindow::containing(now).unwrap();
        assert_eq!((window.year, window.month), (2025, 2));
        assert_eq!(window.label(), "02/2025");
    }
}
