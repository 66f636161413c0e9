// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user ride preferences.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub const DEFAULT_MIN_DISTANCE: u32 = 0;
pub const DEFAULT_MAX_DISTANCE: u32 = 100;
pub const DEFAULT_SEARCH_RADIUS: u32 = 50;

/// Stored preferences (one record per user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserPreferences {
    pub id: String,
    pub user_id: String,
    pub ride_types: Vec<String>,
    pub difficulties: Vec<String>,
    pub paces: Vec<String>,
    pub terrains: Vec<String>,
    /// Short weekday names ("Mon" .. "Sun")
    pub available_days: Vec<String>,
    pub club_affiliation: Option<String>,
    pub min_distance: u32,
    pub max_distance: u32,
    /// Search radius in miles
    pub search_radius: u32,
}

impl UserPreferences {
    pub fn from_input(id: String, user_id: String, input: PreferencesInput) -> Self {
        Self {
            id,
            user_id,
            ride_types: input.ride_types,
            difficulties: input.difficulties,
            paces: input.paces,
            terrains: input.terrains,
            available_days: input.available_days,
            club_affiliation: input.club_affiliation,
            min_distance: input.min_distance,
            max_distance: input.max_distance,
            search_radius: input.search_radius,
        }
    }

    pub fn to_input(&self) -> PreferencesInput {
        PreferencesInput {
            ride_types: self.ride_types.clone(),
            difficulties: self.difficulties.clone(),
            paces: self.paces.clone(),
            terrains: self.terrains.clone(),
            available_days: self.available_days.clone(),
            club_affiliation: self.club_affiliation.clone(),
            min_distance: self.min_distance,
            max_distance: self.max_distance,
            search_radius: self.search_radius,
        }
    }
}

/// Request body for creating or replacing preferences.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_distance_range"))]
pub struct PreferencesInput {
    #[serde(default)]
    pub ride_types: Vec<String>,
    #[serde(default)]
    pub difficulties: Vec<String>,
    #[serde(default)]
    pub paces: Vec<String>,
    #[serde(default)]
    pub terrains: Vec<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_day_names"))]
    pub available_days: Vec<String>,
    #[validate(length(max = 100))]
    pub club_affiliation: Option<String>,
    #[serde(default = "default_min_distance")]
    pub min_distance: u32,
    #[serde(default = "default_max_distance")]
    pub max_distance: u32,
    #[serde(default = "default_search_radius")]
    #[validate(range(max = 500))]
    pub search_radius: u32,
}

fn default_min_distance() -> u32 {
    DEFAULT_MIN_DISTANCE
}
fn default_max_distance() -> u32 {
    DEFAULT_MAX_DISTANCE
}
fn default_search_radius() -> u32 {
    DEFAULT_SEARCH_RADIUS
}

/// Weekday abbreviations accepted in `available_days`.
pub const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn validate_day_names(days: &[String]) -> Result<(), ValidationError> {
    if days.iter().all(|d| DAY_NAMES.contains(&d.as_str())) {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_day_name"))
    }
}

fn validate_distance_range(input: &PreferencesInput) -> Result<(), ValidationError> {
    if input.min_distance > input.max_distance {
        return Err(ValidationError::new("min_distance_exceeds_max"));
    }
    Ok(())
}

/// Partial preferences update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPatch {
    pub ride_types: Option<Vec<String>>,
    pub difficulties: Option<Vec<String>>,
    pub paces: Option<Vec<String>>,
    pub terrains: Option<Vec<String>>,
    pub available_days: Option<Vec<String>>,
    pub club_affiliation: Option<String>,
    pub min_distance: Option<u32>,
    pub max_distance: Option<u32>,
    pub search_radius: Option<u32>,
}

impl PreferencesPatch {
    pub fn apply(self, input: &mut PreferencesInput) {
        if let Some(v) = self.ride_types {
            input.ride_types = v;
        }
        if let Some(v) = self.difficulties {
            input.difficulties = v;
        }
        if let Some(v) = self.paces {
            input.paces = v;
        }
        if let Some(v) = self.terrains {
            input.terrains = v;
        }
        if let Some(v) = self.available_days {
            input.available_days = v;
        }
        if let Some(v) = self.club_affiliation {
            input.club_affiliation = Some(v);
        }
        if let Some(v) = self.min_distance {
            input.min_distance = v;
        }
        if let Some(v) = self.max_distance {
            input.max_distance = v;
        }
        if let Some(v) = self.search_radius {
            input.search_radius = v;
        }
    }
}
