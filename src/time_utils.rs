// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat};

/// Format a calendar date as the RFC3339 instant of its start of day,
/// with millisecond precision and a `Z` suffix.
pub fn format_date_as_instant(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse the calendar date back out of a string produced by
/// [`format_date_as_instant`].
pub fn parse_instant_date(raw: &str) -> Option<NaiveDate> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Current local wall-clock time. Rides are scheduled in local calendar
/// dates, so this is the "now" handed to the recurrence expander.
pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
