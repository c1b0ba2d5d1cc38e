//! Booking calendar window.
//!
//! A [`CalendarWindow`] captures the legal booking date range for a given
//! "today": weekdays from today up to and including today plus the configured
//! number of calendar months. The window is a pure value object; injecting
//! "today" keeps every date decision deterministic under test.
//!
//! Month arithmetic is exact calendar-month addition with month-end clamping
//! (Jan 31 + 3 months = Apr 30), not a fixed number of days.

use chrono::{Datelike, Months, NaiveDate, Weekday};

/// Why a date was rejected by the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateRejection {
    /// The date is before today.
    InPast,
    /// The date is after the end of the booking window.
    BeyondWindow { max_date: NaiveDate },
    /// The date falls on a Saturday or Sunday.
    Weekend,
}

impl std::fmt::Display for DateRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateRejection::InPast => write!(f, "the date is in the past"),
            DateRejection::BeyondWindow { max_date } => {
                write!(f, "bookings are only open up to {max_date}")
            }
            DateRejection::Weekend => {
                write!(f, "appointments are only available Monday to Friday")
            }
        }
    }
}

/// The legal booking date range for a given "today".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarWindow {
    min_date: NaiveDate,
    max_date: NaiveDate,
}

impl CalendarWindow {
    /// Builds the window anchored at `today`, extending `window_months`
    /// calendar months ahead (inclusive).
    ///
    /// When the target month is shorter than the anchor day allows, the end
    /// date clamps to the last valid day of the target month.
    pub fn for_today(today: NaiveDate, window_months: u32) -> Self {
        let max_date = today
            .checked_add_months(Months::new(window_months))
            .unwrap_or(NaiveDate::MAX);
        Self {
            min_date: today,
            max_date,
        }
    }

    /// First bookable date (today).
    pub fn min_date(&self) -> NaiveDate {
        self.min_date
    }

    /// Last bookable date (inclusive).
    pub fn max_date(&self) -> NaiveDate {
        self.max_date
    }

    /// Returns the rule `date` violates, if any.
    ///
    /// Checks run range-first so a weekend date outside the window reports
    /// the range problem, which is the actionable one for the caller.
    pub fn rejection(&self, date: NaiveDate) -> Option<DateRejection> {
        if date < self.min_date {
            return Some(DateRejection::InPast);
        }
        if date > self.max_date {
            return Some(DateRejection::BeyondWindow {
                max_date: self.max_date,
            });
        }
        if is_weekend(date) {
            return Some(DateRejection::Weekend);
        }
        None
    }

    /// Whether `date` may be booked.
    pub fn is_bookable(&self, date: NaiveDate) -> bool {
        self.rejection(date).is_none()
    }
}

/// Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn test_rejects_weekend_dates() {
        // 2024-06-10 is a Monday.
        let window = CalendarWindow::for_today(date(2024, 6, 10), 3);
        assert!(!window.is_bookable(date(2024, 6, 15)), "Saturday");
        assert!(!window.is_bookable(date(2024, 6, 16)), "Sunday");
        assert_eq!(
            window.rejection(date(2024, 6, 15)),
            Some(DateRejection::Weekend)
        );
    }

    #[test]
    fn test_accepts_weekdays_inside_window() {
        let window = CalendarWindow::for_today(date(2024, 6, 10), 3);
        assert!(window.is_bookable(date(2024, 6, 10)), "today itself");
        assert!(window.is_bookable(date(2024, 6, 11)));
        assert!(window.is_bookable(date(2024, 9, 10)), "window end");
    }

    #[test]
    fn test_rejects_past_dates() {
        let window = CalendarWindow::for_today(date(2024, 6, 10), 3);
        assert_eq!(
            window.rejection(date(2024, 6, 7)),
            Some(DateRejection::InPast)
        );
    }

    #[test]
    fn test_window_ends_three_months_out() {
        let window = CalendarWindow::for_today(date(2024, 6, 10), 3);
        assert_eq!(window.max_date(), date(2024, 9, 10));
        // 2024-09-11 is a Wednesday but beyond the window.
        assert!(window.is_bookable(date(2024, 9, 10)));
        assert_eq!(
            window.rejection(date(2024, 9, 11)),
            Some(DateRejection::BeyondWindow {
                max_date: date(2024, 9, 10)
            })
        );
    }

    #[test]
    fn test_month_end_clamps_to_last_valid_day() {
        // Jan 31 + 3 months would be Apr 31; clamps to Apr 30.
        let window = CalendarWindow::for_today(date(2024, 1, 31), 3);
        assert_eq!(window.max_date(), date(2024, 4, 30));

        // Nov 30 + 3 months clamps into February (leap year).
        let window = CalendarWindow::for_today(date(2023, 11, 30), 3);
        assert_eq!(window.max_date(), date(2024, 2, 29));

        let window = CalendarWindow::for_today(date(2024, 11, 30), 3);
        assert_eq!(window.max_date(), date(2025, 2, 28));
    }

    #[test]
    fn test_weekend_outside_window_reports_range_first() {
        let window = CalendarWindow::for_today(date(2024, 6, 10), 3);
        // 2024-09-14 is a Saturday beyond the window end.
        assert_eq!(
            window.rejection(date(2024, 9, 14)),
            Some(DateRejection::BeyondWindow {
                max_date: date(2024, 9, 10)
            })
        );
    }
}
