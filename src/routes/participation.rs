// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Joining, leaving and commenting on rides.
//!
//! Recurring rides are joined as a series: occurrence ids resolve to their
//! template before anything is recorded.

use crate::db::new_id;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Comment, NewComment, RideParticipant};
use crate::routes::rides::{resolve_ride, ListQuery, RideList};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use std::collections::HashSet;
use std::sync::Arc;
use validator::Validate;

/// Routes readable without a session.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/rides/{id}/participants", get(get_participants))
        .route("/api/rides/{id}/comments", get(get_comments))
}

/// Routes that require authentication.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/joined-rides", get(get_joined_rides))
        .route("/api/rides/{id}/join", post(join_ride))
        .route("/api/rides/{id}/leave", delete(leave_ride))
        .route("/api/rides/{id}/comments", post(create_comment))
        .route("/api/comments/{id}", delete(delete_comment))
}

// ─── Participants ────────────────────────────────────────────

async fn get_participants(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<RideParticipant>>> {
    let (ride, _) = resolve_ride(&state, &id).await?;
    Ok(Json(state.db.get_ride_participants(&ride.id).await?))
}

/// Join a ride (or, for an occurrence id, its series).
async fn join_ride(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<RideParticipant>)> {
    let (ride, _) = resolve_ride(&state, &id).await?;
    if ride.is_archived {
        return Err(AppError::BadRequest("Ride is archived".to_string()));
    }

    let participant = state
        .db
        .add_ride_participant(&ride.id, &user.user_id, ride.max_participants)
        .await?;

    tracing::info!(ride_id = %ride.id, user_id = %user.user_id, "Joined ride");
    Ok((StatusCode::CREATED, Json(participant)))
}

async fn leave_ride(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let (ride, _) = resolve_ride(&state, &id).await?;

    let removed = state
        .db
        .remove_ride_participant(&ride.id, &user.user_id)
        .await?;
    tracing::info!(ride_id = %ride.id, user_id = %user.user_id, removed, "Left ride");
    Ok(StatusCode::NO_CONTENT)
}

/// Rides the current user has joined. Returns templates unless
/// `expand=true`.
async fn get_joined_rides(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ListQuery>,
) -> Result<Json<RideList>> {
    let ride_ids: HashSet<String> = state
        .db
        .get_user_participations(&user.user_id)
        .await?
        .into_iter()
        .map(|p| p.ride_id)
        .collect();

    let rides = if ride_ids.is_empty() {
        vec![]
    } else {
        state
            .db
            .get_active_rides()
            .await?
            .into_iter()
            .filter(|r| ride_ids.contains(&r.id))
            .collect()
    };

    Ok(Json(RideList::build(&state, rides, &params)?))
}

// ─── Comments ────────────────────────────────────────────────

async fn get_comments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Comment>>> {
    let (ride, _) = resolve_ride(&state, &id).await?;
    Ok(Json(state.db.get_ride_comments(&ride.id).await?))
}

async fn create_comment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<NewComment>,
) -> Result<(StatusCode, Json<Comment>)> {
    body.validate()?;
    let (ride, _) = resolve_ride(&state, &id).await?;

    let comment = Comment {
        id: new_id(),
        ride_id: ride.id,
        user_id: user.user_id,
        content: body.content,
        created_at: chrono::Utc::now(),
    };
    state.db.create_comment(&comment).await?;

    tracing::debug!(comment_id = %comment.id, ride_id = %comment.ride_id, "Comment posted");
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Delete a comment. Only its author may do so.
async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let comment = state
        .db
        .get_comment(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", id)))?;

    if comment.user_id != user.user_id {
        return Err(AppError::Forbidden("Not authorized".to_string()));
    }

    state.db.delete_comment(&comment.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
