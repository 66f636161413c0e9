// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request bodies for creating and editing rides.

use crate::models::ride::{RecurrencePattern, Ride};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError};

/// Full ride definition as submitted by an organizer.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_recurrence"))]
pub struct RideInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub ride_type: String,
    pub date: NaiveDate,
    #[validate(length(min = 1, max = 20))]
    pub time: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub state: String,
    #[validate(length(max = 20))]
    pub zip_code: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[validate(range(max = 1000))]
    pub distance: u32,
    #[validate(length(min = 1, max = 50))]
    pub difficulty: String,
    #[validate(length(min = 1, max = 50))]
    pub pace: String,
    #[validate(length(min = 1, max = 50))]
    pub terrain: String,
    #[validate(range(min = 1, max = 500))]
    pub max_participants: u32,
    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[serde(default)]
    pub is_recurring: bool,
    pub recurrence_pattern: Option<String>,
    #[validate(range(max = 6))]
    pub recurrence_day_of_week: Option<u8>,
    pub recurrence_end_date: Option<NaiveDate>,
}

/// Recurring rides need a known pattern, weekly cadences need a day, and
/// the series cannot end before it starts.
fn validate_recurrence(input: &RideInput) -> Result<(), ValidationError> {
    if input.is_recurring {
        let raw = input
            .recurrence_pattern
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ValidationError::new("recurrence_pattern_required"))?;

        match RecurrencePattern::parse(raw) {
            None => return Err(ValidationError::new("unknown_recurrence_pattern")),
            Some(RecurrencePattern::Weekly | RecurrencePattern::Biweekly)
                if input.recurrence_day_of_week.is_none() =>
            {
                return Err(ValidationError::new("recurrence_day_of_week_required"));
            }
            Some(_) => {}
        }
    }

    if let Some(end) = input.recurrence_end_date {
        if end < input.date {
            return Err(ValidationError::new("recurrence_end_before_start"));
        }
    }

    Ok(())
}

impl RideInput {
    /// Build the stored record for a new or replaced ride.
    pub fn into_ride(self, id: String, organizer_id: String, created_at: DateTime<Utc>) -> Ride {
        Ride {
            id,
            title: self.title,
            ride_type: self.ride_type,
            date: self.date,
            time: self.time,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            latitude: self.latitude,
            longitude: self.longitude,
            distance: self.distance,
            difficulty: self.difficulty,
            pace: self.pace,
            terrain: self.terrain,
            max_participants: self.max_participants,
            description: self.description,
            organizer_id,
            is_archived: false,
            created_at,
            is_recurring: self.is_recurring,
            recurrence_pattern: self.recurrence_pattern,
            recurrence_day_of_week: self.recurrence_day_of_week,
            recurrence_end_date: self.recurrence_end_date,
        }
    }
}

impl From<&Ride> for RideInput {
    fn from(ride: &Ride) -> Self {
        Self {
            title: ride.title.clone(),
            ride_type: ride.ride_type.clone(),
            date: ride.date,
            time: ride.time.clone(),
            city: ride.city.clone(),
            state: ride.state.clone(),
            zip_code: ride.zip_code.clone(),
            latitude: ride.latitude,
            longitude: ride.longitude,
            distance: ride.distance,
            difficulty: ride.difficulty.clone(),
            pace: ride.pace.clone(),
            terrain: ride.terrain.clone(),
            max_participants: ride.max_participants,
            description: ride.description.clone(),
            is_recurring: ride.is_recurring,
            recurrence_pattern: ride.recurrence_pattern.clone(),
            recurrence_day_of_week: ride.recurrence_day_of_week,
            recurrence_end_date: ride.recurrence_end_date,
        }
    }
}

/// Partial update. Nullable fields distinguish "absent" (keep) from
/// explicit `null` (clear).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RidePatch {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub ride_type: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub zip_code: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub longitude: Option<Option<f64>>,
    pub distance: Option<u32>,
    pub difficulty: Option<String>,
    pub pace: Option<String>,
    pub terrain: Option<String>,
    pub max_participants: Option<u32>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub is_recurring: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub recurrence_pattern: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub recurrence_day_of_week: Option<Option<u8>>,
    #[serde(default, deserialize_with = "double_option")]
    pub recurrence_end_date: Option<Option<NaiveDate>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

macro_rules! apply_fields {
    ($patch:ident, $input:ident, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $patch.$field {
                $input.$field = value;
            }
        )+
    };
}

impl RidePatch {
    /// Overlay the patch onto an existing definition. The result must be
    /// validated again before it is stored.
    pub fn apply(self, input: &mut RideInput) {
        let patch = self;
        apply_fields!(
            patch,
            input,
            title,
            ride_type,
            date,
            time,
            city,
            state,
            zip_code,
            latitude,
            longitude,
            distance,
            difficulty,
            pace,
            terrain,
            max_participants,
            description,
            is_recurring,
            recurrence_pattern,
            recurrence_day_of_week,
            recurrence_end_date,
        );
    }
}
