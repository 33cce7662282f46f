//! Calendar arithmetic for period construction.
//!
//! Month lengths, leap years and ISO week alignment are handled here so the
//! period builders in [`crate::periods`] never do ad hoc date offsetting.

use chrono::{Datelike, Days, NaiveDate};

/// The number of days in the given month, accounting for leap years.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Gregorian leap year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// The first day of `date`'s month.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("day 1 exists in every month")
}

/// The last day of `date`'s month.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let last_day = days_in_month(date.year(), date.month());
    date.with_day(last_day)
        .expect("computed last day exists in its month")
}

/// The first day of the month after `date`'s month.
pub fn next_month_start(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).expect("day 1 exists in every month")
}

/// The Monday on or before `date` (ISO convention: Monday starts the week).
pub fn week_monday(date: NaiveDate) -> NaiveDate {
    let days_since_monday = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(Days::new(days_since_monday))
        .expect("date minus at most six days is in range")
}
