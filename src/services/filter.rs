// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ride listing filters.
//!
//! Filters run after recurrence expansion so day-of-week constraints apply
//! to each concrete occurrence rather than to a series' anchor date.

use crate::models::preferences::DAY_NAMES;
use crate::models::{ExpandedRide, UserPreferences};
use chrono::{Datelike, Weekday};

/// Criteria a listed ride must satisfy. Empty lists match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RideFilter {
    pub ride_types: Vec<String>,
    pub difficulties: Vec<String>,
    pub paces: Vec<String>,
    pub terrains: Vec<String>,
    pub weekdays: Vec<Weekday>,
    pub min_distance: Option<u32>,
    pub max_distance: Option<u32>,
}

/// Parse a short day name ("Mon" .. "Sun").
pub fn parse_day_name(name: &str) -> Option<Weekday> {
    DAY_NAMES
        .iter()
        .position(|d| d.eq_ignore_ascii_case(name))
        .and_then(|i| Weekday::try_from(i as u8).ok())
}

fn matches_any(allowed: &[String], value: &str) -> bool {
    allowed.is_empty() || allowed.iter().any(|a| a.eq_ignore_ascii_case(value))
}

impl RideFilter {
    /// Filter derived from a user's saved preferences. Unknown day names
    /// are ignored.
    pub fn from_preferences(prefs: &UserPreferences) -> Self {
        Self {
            ride_types: prefs.ride_types.clone(),
            difficulties: prefs.difficulties.clone(),
            paces: prefs.paces.clone(),
            terrains: prefs.terrains.clone(),
            weekdays: prefs
                .available_days
                .iter()
                .filter_map(|d| parse_day_name(d))
                .collect(),
            min_distance: Some(prefs.min_distance),
            max_distance: Some(prefs.max_distance),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, entry: &ExpandedRide) -> bool {
        let ride = &entry.ride;

        matches_any(&self.ride_types, &ride.ride_type)
            && matches_any(&self.difficulties, &ride.difficulty)
            && matches_any(&self.paces, &ride.pace)
            && matches_any(&self.terrains, &ride.terrain)
            && (self.weekdays.is_empty() || self.weekdays.contains(&entry.date().weekday()))
            && self.min_distance.is_none_or(|min| ride.distance >= min)
            && self.max_distance.is_none_or(|max| ride.distance <= max)
    }

    /// Keep only matching rides, preserving order.
    pub fn apply(&self, rides: Vec<ExpandedRide>) -> Vec<ExpandedRide> {
        if self.is_empty() {
            return rides;
        }
        rides.into_iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day_name() {
        assert_eq!(parse_day_name("Mon"), Some(Weekday::Mon));
        assert_eq!(parse_day_name("sun"), Some(Weekday::Sun));
        assert_eq!(parse_day_name("Sat"), Some(Weekday::Sat));
        assert_eq!(parse_day_name("Saturday"), None);
    }

    #[test]
    fn test_default_filter_is_empty() {
        assert!(RideFilter::default().is_empty());
        let filter = RideFilter {
            min_distance: Some(10),
            ..Default::default()
        };
        assert!(!filter.is_empty());
    }
}
