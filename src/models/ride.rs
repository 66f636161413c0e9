// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ride listing model for storage and API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// How often a recurring ride repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrencePattern {
    Weekly,
    Biweekly,
    Monthly,
}

impl RecurrencePattern {
    pub const WEEKLY: &'static str = "weekly";
    pub const BIWEEKLY: &'static str = "biweekly";
    pub const MONTHLY: &'static str = "monthly";

    /// Parse the stored pattern string. Unknown values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            Self::WEEKLY => Some(Self::Weekly),
            Self::BIWEEKLY => Some(Self::Biweekly),
            Self::MONTHLY => Some(Self::Monthly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => Self::WEEKLY,
            Self::Biweekly => Self::BIWEEKLY,
            Self::Monthly => Self::MONTHLY,
        }
    }
}

/// Stored ride record.
///
/// For a recurring ride this is the template of the series: `date` is the
/// anchor occurrence and the `recurrence_*` fields describe the cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Ride {
    /// Store-assigned identifier (UUID v4)
    pub id: String,
    pub title: String,
    /// Activity type (road, gravel, mtb, ...)
    #[serde(rename = "type")]
    pub ride_type: String,
    /// Calendar date of the ride, or of the anchor occurrence when recurring
    pub date: NaiveDate,
    /// Start time as entered by the organizer (e.g. "07:30")
    pub time: String,
    pub city: String,
    pub state: String,
    pub zip_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Distance in miles
    pub distance: u32,
    pub difficulty: String,
    pub pace: String,
    pub terrain: String,
    pub max_participants: u32,
    pub description: Option<String>,
    pub organizer_id: String,
    #[serde(default)]
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub is_recurring: bool,
    /// "weekly", "biweekly" or "monthly"
    pub recurrence_pattern: Option<String>,
    /// 0-6, Sunday = 0. Used by weekly and biweekly rides only.
    pub recurrence_day_of_week: Option<u8>,
    pub recurrence_end_date: Option<NaiveDate>,
}

impl Ride {
    /// Parsed recurrence pattern, if the ride is recurring and the stored
    /// pattern is recognized.
    pub fn pattern(&self) -> Option<RecurrencePattern> {
        self.recurrence_pattern
            .as_deref()
            .and_then(RecurrencePattern::parse)
    }
}

/// One concrete, dated ride as returned by listing endpoints.
///
/// Generated occurrences carry a synthetic `id` of the form
/// `{template_id}_{YYYY-MM-DD}T00:00:00.000Z`; one-off rides pass through
/// with the template's own id and no instance fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExpandedRide {
    #[serde(flatten)]
    pub ride: Ride,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_recurring_instance: bool,
}

impl ExpandedRide {
    /// Wrap a one-off ride without modification.
    pub fn passthrough(ride: Ride) -> Self {
        Self {
            ride,
            instance_date: None,
            is_recurring_instance: false,
        }
    }

    /// Materialize `template` on `date`.
    pub fn occurrence(template: &Ride, date: NaiveDate) -> Self {
        let mut ride = template.clone();
        ride.id = occurrence_id(&template.id, date);
        ride.date = date;
        Self {
            ride,
            instance_date: Some(date),
            is_recurring_instance: true,
        }
    }

    /// Occurrence date (the ride's own date for one-off rides).
    pub fn date(&self) -> NaiveDate {
        self.ride.date
    }

    /// Identifier of the template this entry was generated from.
    pub fn template_id(&self) -> &str {
        if self.is_recurring_instance {
            split_occurrence_id(&self.ride.id).0
        } else {
            &self.ride.id
        }
    }
}

/// Build the synthetic identifier for one occurrence of a template.
pub fn occurrence_id(template_id: &str, date: NaiveDate) -> String {
    format!(
        "{}_{}",
        template_id,
        crate::time_utils::format_date_as_instant(date)
    )
}

/// Split an id into the template id and, for synthetic occurrence ids, the
/// occurrence date. Plain template ids return `None` for the date.
pub fn split_occurrence_id(id: &str) -> (&str, Option<NaiveDate>) {
    if let Some((template_id, suffix)) = id.rsplit_once('_') {
        if let Some(date) = crate::time_utils::parse_instant_date(suffix) {
            return (template_id, Some(date));
        }
    }
    (id, None)
}
