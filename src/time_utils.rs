// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for calendar dates.

use chrono::{Days, Local, NaiveDate};

/// Weeks between today and the suggested target date for a new goal.
pub const DEFAULT_GOAL_LEAD_WEEKS: u64 = 16;

/// Today's date in the local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_iso_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

/// Shift a date by a (possibly negative) number of weeks.
///
/// Returns `None` when the result leaves chrono's supported range.
pub fn add_weeks(date: NaiveDate, weeks: i64) -> Option<NaiveDate> {
    let days = weeks.unsigned_abs().checked_mul(7)?;
    if weeks >= 0 {
        date.checked_add_days(Days::new(days))
    } else {
        date.checked_sub_days(Days::new(days))
    }
}

/// Suggested target date for a goal drafted on `from`.
pub fn default_target_date(from: NaiveDate) -> NaiveDate {
    from.checked_add_days(Days::new(DEFAULT_GOAL_LEAD_WEEKS * 7))
        .unwrap_or(from)
}
