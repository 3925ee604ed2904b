//! Calendar arithmetic on `NaiveDate`
//!
//! Whole-day and whole-month counting in the proleptic Gregorian calendar.
//! No business-day or holiday adjustment is applied anywhere.

use chrono::{Datelike, Months, NaiveDate};

use crate::error::{BondError, BondResult};

/// Shift a date by `months` calendar months (negative steps backward)
///
/// The day-of-month is clamped to the last valid day of the target month,
/// so Jan 31 + 1 month lands on Feb 28 (Feb 29 in leap years).
pub fn add_months(date: NaiveDate, months: i32) -> BondResult<NaiveDate> {
    let step = Months::new(months.unsigned_abs());
    let shifted = if months >= 0 {
        date.checked_add_months(step)
    } else {
        date.checked_sub_months(step)
    };

    shifted.ok_or(BondError::DateOutOfRange { date, months })
}

/// Absolute number of whole days between two dates
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days().abs()
}

/// Calendar months from `a` to `b`, ignoring the day of month
///
/// Signed: negative when `b` falls in an earlier month than `a`.
pub fn months_between(a: NaiveDate, b: NaiveDate) -> i32 {
    (b.year() - a.year()) * 12 + (b.month() as i32 - a.month() as i32)
}
