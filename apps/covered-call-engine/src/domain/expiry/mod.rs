//! Monthly option expiration scheduling.
//!
//! Standard U.S. equity options expire on the third Friday of the month.
//! The next expiry is always taken from the calendar month after the
//! reference date, so it lies strictly in the future.

use chrono::{Datelike, Days, NaiveDate};

/// Third Friday of the given month, or `None` if the month is not representable.
#[must_use]
pub fn third_friday(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;

    // Friday is 4 days from Monday; a month starting on Friday has offset 0
    let first_weekday = first.weekday().num_days_from_monday();
    let days_to_friday = (4 + 7 - first_weekday) % 7;

    first.checked_add_days(Days::new(u64::from(days_to_friday) + 14))
}

/// Expiration date of the next standard monthly contract.
///
/// Returns the third Friday of the month following `reference`, rolling
/// December over into January of the next year.
///
/// # Panics
///
/// Panics only for reference dates in the last month chrono can represent.
#[must_use]
#[allow(clippy::expect_used)]
pub fn next_monthly_expiry(reference: NaiveDate) -> NaiveDate {
    let (year, month) = if reference.month() == 12 {
        (reference.year() + 1, 1)
    } else {
        (reference.year(), reference.month() + 1)
    };

    third_friday(year, month).expect("month after a representable date is representable")
}

/// Whole calendar days from `reference` until `expiry`.
///
/// Expiry is treated as the start of its day, so the ceiling of the elapsed
/// fraction from any time on `reference` equals the calendar difference.
/// Clamped at zero for expiries already in the past.
#[must_use]
pub fn days_to_expiry(expiry: NaiveDate, reference: NaiveDate) -> u32 {
    let days = expiry.signed_duration_since(reference).num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}
