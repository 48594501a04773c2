//! Calendar arithmetic for week and month views.
//!
//! Every function works on local calendar days ([`NaiveDate`]); nothing here
//! converts through UTC or epoch milliseconds, so daylight-saving shifts can
//! never move a task to a neighbouring day. Weeks start on Monday.

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;

/// Full day names, indexed from Sunday.
pub const DAY_NAMES: [&str; 7] =
    ["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];

/// Short day names, indexed from Sunday.
pub const DAY_SHORT: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Short month names, indexed from January.
pub const MONTH_SHORT: [&str; 12] =
    ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// Full month names, indexed from January.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

static DATE_KEY_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date key pattern is valid"));

/// Today's date in the local time zone.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a date as a `YYYY-MM-DD` key.
#[must_use]
pub fn to_date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Check that a string has the `YYYY-MM-DD` shape (digits only, zero padded).
#[must_use]
pub fn is_date_key(s: &str) -> bool {
    DATE_KEY_SHAPE.is_match(s)
}

/// Parse a `YYYY-MM-DD` key into a date.
///
/// Returns `None` for anything that is not zero-padded `YYYY-MM-DD` or that
/// names a day that does not exist (`2025-02-30`).
#[must_use]
pub fn parse_date_key(s: &str) -> Option<NaiveDate> {
    if !is_date_key(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// The Monday of the week containing `date`.
///
/// Sunday belongs to the week that started six days earlier.
#[must_use]
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Monday through Sunday of the week containing `date`.
#[must_use]
pub fn week_dates(date: NaiveDate) -> [NaiveDate; 7] {
    let monday = monday_of(date);
    let mut week = [monday; 7];
    for (offset, day) in (0..).zip(week.iter_mut()) {
        *day = monday + Duration::days(offset);
    }
    week
}

/// First and last day of a month (`month` is 1-based).
#[must_use]
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next_first.pred_opt()?))
}

/// All dates shown in a month calendar grid.
///
/// The grid starts on the Monday on or before the 1st and ends on the Sunday
/// on or after the last day, so its length is always a multiple of seven.
/// A month that already starts on Monday (or ends on Sunday) gets no padding
/// on that side. Returns `None` for an invalid month.
#[must_use]
pub fn month_grid_dates(year: i32, month: u32) -> Option<Vec<NaiveDate>> {
    let (first, last) = month_bounds(year, month)?;
    let start = monday_of(first);
    let end = last + Duration::days(i64::from(6 - last.weekday().num_days_from_monday()));
    Some(start.iter_days().take_while(|d| *d <= end).collect())
}

/// The first day of the month `delta` months away from `date`'s month.
#[must_use]
pub fn shift_month(date: NaiveDate, delta: i32) -> NaiveDate {
    let month0 = i32::try_from(date.month0()).unwrap_or_default();
    let index = date.year() * 12 + month0 + delta;
    let year = index.div_euclid(12);
    let month = u32::try_from(index.rem_euclid(12)).unwrap_or_default() + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

/// Label a week, e.g. `"Feb 10 - 16, 2025"` or `"Feb 24 - Mar 2, 2025"`.
///
/// The year shown is the Sunday's year.
#[must_use]
pub fn format_week_range(week: &[NaiveDate; 7]) -> String {
    let first = week[0];
    let last = week[6];
    let start_month = MONTH_SHORT[first.month0() as usize];
    let end_month = MONTH_SHORT[last.month0() as usize];

    if first.month() == last.month() {
        format!("{start_month} {} - {}, {}", first.day(), last.day(), last.year())
    } else {
        format!("{start_month} {} - {end_month} {}, {}", first.day(), last.day(), last.year())
    }
}

/// Label a month, e.g. `"February 2026"`.
#[must_use]
pub fn format_month(date: NaiveDate) -> String {
    format!("{} {}", MONTH_NAMES[date.month0() as usize], date.year())
}

/// Short day header, e.g. `"Mon 10"`.
#[must_use]
pub fn format_day_header(date: NaiveDate) -> String {
    format!("{} {}", DAY_SHORT[date.weekday().num_days_from_sunday() as usize], date.day())
}

/// Full weekday name of a date.
#[must_use]
pub fn day_name(date: NaiveDate) -> &'static str {
    DAY_NAMES[date.weekday().num_days_from_sunday() as usize]
}

/// Whether two dates are the same calendar day.
#[must_use]
pub fn is_same_day(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

/// Whether two dates fall in the same month of the same year.
#[must_use]
pub fn is_same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Whether a date is a Saturday or Sunday.
#[must_use]
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Whether `date` is `today`.
#[must_use]
pub fn is_today(date: NaiveDate, today: NaiveDate) -> bool {
    is_same_day(date, today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date_key(s).unwrap()
    }

    #[test]
    fn test_to_date_key_zero_pads() {
        assert_eq!(to_date_key(d("2025-02-05")), "2025-02-05");
        assert_eq!(to_date_key(NaiveDate::from_ymd_opt(987, 1, 9).unwrap()), "0987-01-09");
    }

    #[test]
    fn test_parse_date_key_rejects_bad_shapes() {
        assert!(parse_date_key("2025-2-5").is_none());
        assert!(parse_date_key("2025-02-30").is_none());
        assert!(parse_date_key("20250205").is_none());
        assert!(parse_date_key(" 2025-02-05").is_none());
        assert!(parse_date_key("2025-02-05T00:00").is_none());
    }

    #[test]
    fn test_is_date_key_is_shape_only() {
        assert!(is_date_key("2025-13-45"));
        assert!(!is_date_key("tomorrow"));
    }

    #[test]
    fn test_monday_of_each_weekday() {
        // 2025-02-10 is a Monday
        for day in 10..=16 {
            let date = NaiveDate::from_ymd_opt(2025, 2, day).unwrap();
            assert_eq!(monday_of(date), d("2025-02-10"), "day {day}");
        }
        assert_eq!(monday_of(d("2025-02-17")), d("2025-02-17"));
    }

    #[test]
    fn test_monday_of_sunday_steps_back_six_days() {
        assert_eq!(monday_of(d("2025-03-02")), d("2025-02-24"));
    }

    #[test]
    fn test_monday_of_is_idempotent() {
        let monday = monday_of(d("2024-12-31"));
        assert_eq!(monday_of(monday), monday);
        assert_eq!(monday, d("2024-12-30"));
    }

    #[test]
    fn test_week_dates() {
        let week = week_dates(d("2025-02-13"));
        assert_eq!(week[0], d("2025-02-10"));
        assert_eq!(week[6], d("2025-02-16"));
        assert!(week.windows(2).all(|w| w[1] == w[0].succ_opt().unwrap()));
    }

    #[test]
    fn test_month_grid_padded_both_sides() {
        // February 2026 starts on Sunday and ends on Saturday
        let grid = month_grid_dates(2026, 2).unwrap();
        assert_eq!(grid.first(), Some(&d("2026-01-26")));
        assert_eq!(grid.last(), Some(&d("2026-03-01")));
        assert_eq!(grid.len(), 35);
    }

    #[test]
    fn test_month_grid_starting_on_monday_has_no_leading_week() {
        // September 2025 starts on a Monday and ends on a Tuesday
        let grid = month_grid_dates(2025, 9).unwrap();
        assert_eq!(grid[0], d("2025-09-01"));
        assert_eq!(grid.last(), Some(&d("2025-10-05")));
        assert_eq!(grid.len(), 35);
    }

    #[test]
    fn test_month_grid_ending_on_sunday_has_no_trailing_week() {
        // August 2025 ends on a Sunday
        let grid = month_grid_dates(2025, 8).unwrap();
        assert_eq!(grid.last(), Some(&d("2025-08-31")));
        assert_eq!(grid[0], d("2025-07-28"));
    }

    #[test]
    fn test_month_grid_six_rows() {
        // March 2025 starts on Saturday and has 31 days
        let grid = month_grid_dates(2025, 3).unwrap();
        assert_eq!(grid.len(), 42);
    }

    #[test]
    fn test_month_grid_exact_four_weeks() {
        // February 2021 starts on Monday and ends on Sunday
        let grid = month_grid_dates(2021, 2).unwrap();
        assert_eq!(grid.len(), 28);
    }

    #[test]
    fn test_month_grid_invalid_month() {
        assert!(month_grid_dates(2025, 0).is_none());
        assert!(month_grid_dates(2025, 13).is_none());
    }

    #[test]
    fn test_month_bounds_december_and_leap_year() {
        assert_eq!(month_bounds(2025, 12), Some((d("2025-12-01"), d("2025-12-31"))));
        assert_eq!(month_bounds(2024, 2), Some((d("2024-02-01"), d("2024-02-29"))));
    }

    #[test]
    fn test_shift_month() {
        assert_eq!(shift_month(d("2025-01-31"), -1), d("2024-12-01"));
        assert_eq!(shift_month(d("2025-12-15"), 1), d("2026-01-01"));
        assert_eq!(shift_month(d("2025-05-20"), 0), d("2025-05-01"));
        assert_eq!(shift_month(d("2025-05-20"), -17), d("2023-12-01"));
    }

    #[test]
    fn test_format_week_range_same_month() {
        assert_eq!(format_week_range(&week_dates(d("2025-02-12"))), "Feb 10 - 16, 2025");
    }

    #[test]
    fn test_format_week_range_cross_month() {
        assert_eq!(format_week_range(&week_dates(d("2025-02-26"))), "Feb 24 - Mar 2, 2025");
    }

    #[test]
    fn test_format_week_range_cross_year_uses_sunday_year() {
        assert_eq!(format_week_range(&week_dates(d("2024-12-31"))), "Dec 30 - Jan 5, 2025");
    }

    #[test]
    fn test_format_month_and_day_header() {
        assert_eq!(format_month(d("2026-02-14")), "February 2026");
        assert_eq!(format_day_header(d("2025-02-10")), "Mon 10");
        assert_eq!(day_name(d("2025-02-16")), "Sunday");
    }

    #[test]
    fn test_predicates() {
        assert!(is_same_day(d("2025-02-10"), d("2025-02-10")));
        assert!(!is_same_day(d("2025-02-10"), d("2025-02-11")));
        assert!(is_same_month(d("2025-02-01"), d("2025-02-28")));
        assert!(!is_same_month(d("2025-02-01"), d("2024-02-01")));
        assert!(is_weekend(d("2025-02-15")));
        assert!(is_weekend(d("2025-02-16")));
        assert!(!is_weekend(d("2025-02-14")));
        assert!(is_today(d("2025-02-14"), d("2025-02-14")));
    }
}
