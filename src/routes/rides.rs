// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ride listing and management routes.

use crate::config::MAX_LOOK_AHEAD_DAYS;
use crate::db::new_id;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::ride::split_occurrence_id;
use crate::models::{ExpandedRide, Ride, RideInput, RidePatch};
use crate::services::filter::parse_day_name;
use crate::services::{expand_rides_with, is_occurrence_of, RideFilter};
use crate::time_utils::local_now;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Routes readable without a session.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/rides", get(list_rides))
        .route("/api/rides/{id}", get(get_ride))
}

/// Routes that require authentication (auth layer applied in routes/mod.rs).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/rides", post(create_ride))
        .route(
            "/api/rides/{id}",
            axum::routing::patch(update_ride).delete(delete_ride),
        )
        .route("/api/rides/{id}/archive", post(archive_ride))
        .route("/api/my-rides", get(list_my_rides))
        .route("/api/recommended-rides", get(list_recommended_rides))
}

// ─── Helpers ─────────────────────────────────────────────────

/// Expand templates for a listing response, logging templates whose
/// recurrence data cannot be expanded.
pub(crate) fn expand_for_listing(rides: &[Ride], look_ahead_days: u32) -> Vec<ExpandedRide> {
    expand_rides_with(rides, look_ahead_days, local_now(), |ride, reason| {
        tracing::warn!(
            ride_id = %ride.id,
            pattern = ?ride.recurrence_pattern,
            reason = %reason,
            "Recurring ride produced no occurrences"
        );
    })
}

/// Resolve a template id or synthetic occurrence id to the stored ride.
///
/// Returns the template and, for occurrence ids, the occurrence date. An
/// occurrence id whose date the series never produces is not found.
pub(crate) async fn resolve_ride(
    state: &AppState,
    id: &str,
) -> Result<(Ride, Option<NaiveDate>)> {
    let (template_id, date) = split_occurrence_id(id);
    let ride = state
        .db
        .get_ride(template_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Ride {} not found", template_id)))?;

    if let Some(date) = date {
        if !is_occurrence_of(&ride, date, local_now().date()) {
            return Err(AppError::NotFound(format!("Ride {} not found", id)));
        }
    }
    Ok((ride, date))
}

fn look_ahead(state: &AppState, days: Option<u32>) -> Result<u32> {
    match days {
        None => Ok(state.config.look_ahead_days),
        Some(d) if d <= MAX_LOOK_AHEAD_DAYS => Ok(d),
        Some(_) => Err(AppError::BadRequest(format!(
            "'days' must be between 0 and {}",
            MAX_LOOK_AHEAD_DAYS
        ))),
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn require_organizer(ride: &Ride, user: &AuthUser) -> Result<()> {
    if ride.organizer_id != user.user_id {
        tracing::warn!(
            ride_id = %ride.id,
            user_id = %user.user_id,
            "Rejected change to ride by non-organizer"
        );
        return Err(AppError::Forbidden("Not authorized".to_string()));
    }
    Ok(())
}

// ─── Discover ────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct DiscoverQuery {
    /// Look-ahead override in days
    days: Option<u32>,
    /// Comma-separated activity types
    #[serde(rename = "type")]
    ride_type: Option<String>,
    /// Comma-separated difficulties
    difficulty: Option<String>,
    pace: Option<String>,
    terrain: Option<String>,
    /// Comma-separated short day names ("Sat,Sun")
    day: Option<String>,
    min_distance: Option<u32>,
    max_distance: Option<u32>,
}

impl DiscoverQuery {
    fn filter(&self) -> Result<RideFilter> {
        let weekdays = split_list(self.day.as_deref())
            .iter()
            .map(|d| {
                parse_day_name(d)
                    .ok_or_else(|| AppError::BadRequest(format!("Invalid day name: {}", d)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(RideFilter {
            ride_types: split_list(self.ride_type.as_deref()),
            difficulties: split_list(self.difficulty.as_deref()),
            paces: split_list(self.pace.as_deref()),
            terrains: split_list(self.terrain.as_deref()),
            weekdays,
            min_distance: self.min_distance,
            max_distance: self.max_distance,
        })
    }
}

/// List upcoming rides with recurring series expanded into occurrences.
async fn list_rides(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DiscoverQuery>,
) -> Result<Json<Vec<ExpandedRide>>> {
    let days = look_ahead(&state, params.days)?;
    let filter = params.filter()?;

    let templates = state.db.get_active_rides().await?;
    let rides = filter.apply(expand_for_listing(&templates, days));

    tracing::debug!(
        templates = templates.len(),
        rides = rides.len(),
        days,
        "Listed rides"
    );

    Ok(Json(rides))
}

/// Get one ride. Occurrence ids return that occurrence of the series.
async fn get_ride(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ExpandedRide>> {
    let (ride, date) = resolve_ride(&state, &id).await?;

    let entry = match date {
        Some(date) => ExpandedRide::occurrence(&ride, date),
        None => ExpandedRide::passthrough(ride),
    };
    Ok(Json(entry))
}

// ─── Organizer Views ─────────────────────────────────────────

#[derive(Deserialize, Default)]
pub(crate) struct ListQuery {
    /// Expand recurring rides into occurrences
    #[serde(default)]
    pub expand: bool,
    pub days: Option<u32>,
}

/// Listing response that is either raw templates or expanded rides.
#[derive(serde::Serialize)]
#[serde(untagged)]
pub(crate) enum RideList {
    Templates(Vec<Ride>),
    Expanded(Vec<ExpandedRide>),
}

impl RideList {
    pub(crate) fn build(state: &AppState, rides: Vec<Ride>, query: &ListQuery) -> Result<Self> {
        if query.expand {
            let days = look_ahead(state, query.days)?;
            Ok(RideList::Expanded(expand_for_listing(&rides, days)))
        } else {
            Ok(RideList::Templates(rides))
        }
    }
}

/// Rides organized by the current user. Returns templates unless
/// `expand=true`.
async fn list_my_rides(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ListQuery>,
) -> Result<Json<RideList>> {
    let rides = state.db.get_rides_by_organizer(&user.user_id).await?;
    Ok(Json(RideList::build(&state, rides, &params)?))
}

/// Upcoming rides matching the current user's saved preferences.
async fn list_recommended_rides(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<ExpandedRide>>> {
    let filter = state
        .db
        .get_user_preferences(&user.user_id)
        .await?
        .map(|prefs| RideFilter::from_preferences(&prefs))
        .unwrap_or_default();

    let templates = state.db.get_active_rides().await?;
    let rides = filter.apply(expand_for_listing(
        &templates,
        state.config.look_ahead_days,
    ));
    Ok(Json(rides))
}

// ─── Ride Management ─────────────────────────────────────────

/// Create a ride organized by the current user.
async fn create_ride(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<RideInput>,
) -> Result<(StatusCode, Json<Ride>)> {
    input.validate()?;

    let ride = input.into_ride(new_id(), user.user_id.clone(), chrono::Utc::now());
    state.db.upsert_ride(&ride).await?;

    tracing::info!(
        ride_id = %ride.id,
        organizer_id = %ride.organizer_id,
        recurring = ride.is_recurring,
        pattern = ride.pattern().map(|p| p.as_str()),
        "Ride created"
    );

    Ok((StatusCode::CREATED, Json(ride)))
}

/// Update a ride. Editing an occurrence edits the whole series.
async fn update_ride(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(patch): Json<RidePatch>,
) -> Result<Json<Ride>> {
    let (ride, _) = resolve_ride(&state, &id).await?;
    require_organizer(&ride, &user)?;

    let mut input = RideInput::from(&ride);
    patch.apply(&mut input);
    input.validate()?;

    let mut updated = input.into_ride(ride.id, ride.organizer_id, ride.created_at);
    updated.is_archived = ride.is_archived;
    state.db.upsert_ride(&updated).await?;

    tracing::info!(ride_id = %updated.id, "Ride updated");
    Ok(Json(updated))
}

/// Delete a ride and everything attached to it.
async fn delete_ride(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let (ride, _) = resolve_ride(&state, &id).await?;
    require_organizer(&ride, &user)?;

    state.db.delete_ride(&ride.id).await?;
    tracing::info!(ride_id = %ride.id, "Ride deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Hide a ride from discovery without deleting it.
async fn archive_ride(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Ride>> {
    let (mut ride, _) = resolve_ride(&state, &id).await?;
    require_organizer(&ride, &user)?;

    ride.is_archived = true;
    state.db.upsert_ride(&ride).await?;
    tracing::info!(ride_id = %ride.id, "Ride archived");
    Ok(Json(ride))
}
