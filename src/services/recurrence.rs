// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recurring ride expansion.
//!
//! Turns stored ride templates into the concrete, dated rides shown in
//! listings. One-off rides pass through untouched; recurring rides are
//! materialized from "today" up to a look-ahead horizon (or their own end
//! date, whichever comes first).
//!
//! Dates are local calendar dates. A ride dated today is treated as already
//! started, so generated occurrences always fall strictly after today.

use crate::models::ride::{ExpandedRide, RecurrencePattern, Ride};
use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use std::fmt;

/// Default number of days ahead to generate occurrences for.
pub const DEFAULT_LOOK_AHEAD_DAYS: u32 = 90;

/// Upper bound on generated occurrences per template.
pub const MAX_INSTANCES_PER_RIDE: u32 = 52;

/// Why a recurring template produced no occurrences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The stored pattern is not weekly, biweekly or monthly.
    UnknownPattern(String),
    /// Weekly/biweekly ride without a day of week.
    MissingDayOfWeek,
    /// Day of week outside 0-6.
    InvalidDayOfWeek(u8),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnknownPattern(p) => write!(f, "unknown recurrence pattern {:?}", p),
            SkipReason::MissingDayOfWeek => write!(f, "missing recurrence day of week"),
            SkipReason::InvalidDayOfWeek(d) => write!(f, "invalid recurrence day of week {}", d),
        }
    }
}

/// Expand ride templates into dated rides, sorted by date.
///
/// Malformed recurring templates are dropped silently; use
/// [`expand_rides_with`] to observe them.
pub fn expand_rides(rides: &[Ride], look_ahead_days: u32, now: NaiveDateTime) -> Vec<ExpandedRide> {
    expand_rides_with(rides, look_ahead_days, now, |_, _| {})
}

/// Like [`expand_rides`], calling `on_skip` for every recurring template
/// that contributes nothing because its recurrence data is unusable.
pub fn expand_rides_with<F>(
    rides: &[Ride],
    look_ahead_days: u32,
    now: NaiveDateTime,
    mut on_skip: F,
) -> Vec<ExpandedRide>
where
    F: FnMut(&Ride, SkipReason),
{
    let today = now.date();
    let horizon = today
        .checked_add_days(Days::new(look_ahead_days.into()))
        .unwrap_or(NaiveDate::MAX);

    let mut expanded = Vec::new();

    for ride in rides {
        let raw_pattern = match ride.recurrence_pattern.as_deref() {
            Some(p) if ride.is_recurring && !p.is_empty() => p,
            _ => {
                expanded.push(ExpandedRide::passthrough(ride.clone()));
                continue;
            }
        };

        let end = ride
            .recurrence_end_date
            .map_or(horizon, |end_date| end_date.min(horizon));

        match ride.pattern() {
            Some(RecurrencePattern::Weekly) => match day_of_week(ride) {
                Ok(dow) => expand_weekly(ride, dow, 7, today, end, &mut expanded),
                Err(reason) => on_skip(ride, reason),
            },
            Some(RecurrencePattern::Biweekly) => match day_of_week(ride) {
                Ok(dow) => expand_weekly(ride, dow, 14, today, end, &mut expanded),
                Err(reason) => on_skip(ride, reason),
            },
            Some(RecurrencePattern::Monthly) => expand_monthly(ride, today, end, &mut expanded),
            None => on_skip(ride, SkipReason::UnknownPattern(raw_pattern.to_string())),
        }
    }

    // Stable: same-day rides keep their emission order.
    expanded.sort_by_key(ExpandedRide::date);
    expanded
}

fn day_of_week(ride: &Ride) -> Result<u32, SkipReason> {
    match ride.recurrence_day_of_week {
        None => Err(SkipReason::MissingDayOfWeek),
        Some(d) if d > 6 => Err(SkipReason::InvalidDayOfWeek(d)),
        Some(d) => Ok(d.into()),
    }
}

/// Whether `date` is an occurrence the expander can produce for `ride`,
/// ignoring the look-ahead horizon.
///
/// The date must fall strictly after today, on or before the series' end
/// date, on the cadence of the first generated occurrence and within the
/// per-ride cap. One-off rides and unusable templates have no occurrences.
pub fn is_occurrence_of(ride: &Ride, date: NaiveDate, today: NaiveDate) -> bool {
    if !ride.is_recurring || date <= today {
        return false;
    }
    if ride.recurrence_end_date.is_some_and(|end| date > end) {
        return false;
    }

    let step_days = match ride.pattern() {
        Some(RecurrencePattern::Weekly) => 7,
        Some(RecurrencePattern::Biweekly) => 14,
        Some(RecurrencePattern::Monthly) => return is_monthly_occurrence(ride, date),
        None => return false,
    };

    let Ok(dow) = day_of_week(ride) else {
        return false;
    };
    let first = if ride.date <= today {
        match next_weekday_after(today, dow) {
            Some(next) => next,
            None => return false,
        }
    } else {
        ride.date
    };

    let offset = (date - first).num_days();
    offset >= 0 && offset % step_days == 0 && offset / step_days < i64::from(MAX_INSTANCES_PER_RIDE)
}

fn is_monthly_occurrence(ride: &Ride, date: NaiveDate) -> bool {
    let months = (date.year() - ride.date.year()) * 12 + date.month() as i32
        - ride.date.month() as i32;
    match u32::try_from(months) {
        Ok(n) if n < MAX_INSTANCES_PER_RIDE => {
            ride.date.checked_add_months(Months::new(n)) == Some(date)
        }
        _ => false,
    }
}

/// First date strictly after `today` that falls on `day_of_week`
/// (0 = Sunday).
fn next_weekday_after(today: NaiveDate, day_of_week: u32) -> Option<NaiveDate> {
    let current = i64::from(today.weekday().num_days_from_sunday());
    let mut days_to_add = i64::from(day_of_week) - current;
    if days_to_add <= 0 {
        days_to_add += 7;
    }
    today.checked_add_days(Days::new(days_to_add.unsigned_abs()))
}

/// Weekly and biweekly series. The cap counts emitted occurrences.
fn expand_weekly(
    ride: &Ride,
    day_of_week: u32,
    step_days: u64,
    today: NaiveDate,
    end: NaiveDate,
    out: &mut Vec<ExpandedRide>,
) {
    let mut cursor = if ride.date <= today {
        match next_weekday_after(today, day_of_week) {
            Some(next) => next,
            None => return,
        }
    } else {
        ride.date
    };

    let mut emitted = 0;
    while cursor <= end && emitted < MAX_INSTANCES_PER_RIDE {
        out.push(ExpandedRide::occurrence(ride, cursor));
        emitted += 1;

        cursor = match cursor.checked_add_days(Days::new(step_days)) {
            Some(next) => next,
            None => break,
        };
    }
}

/// Monthly series. Each step is computed from the anchor, so a ride on the
/// 31st lands on the last day of shorter months and returns to the 31st
/// afterwards. The cap counts iterations, including skipped past dates.
fn expand_monthly(ride: &Ride, today: NaiveDate, end: NaiveDate, out: &mut Vec<ExpandedRide>) {
    let mut iterations = 0;
    while iterations < MAX_INSTANCES_PER_RIDE {
        let Some(cursor) = ride.date.checked_add_months(Months::new(iterations)) else {
            break;
        };
        if cursor > end {
            break;
        }
        if cursor > today {
            out.push(ExpandedRide::occurrence(ride, cursor));
        }
        iterations += 1;
    }
}
