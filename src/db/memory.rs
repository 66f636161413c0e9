// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process ride store with typed operations.
//!
//! Provides high-level operations for:
//! - Rides (templates, including recurring series)
//! - Participants (keyed by ride, so joins are checked under one lock)
//! - Comments
//! - User preferences
//!
//! Operations are `async` and return `Result` so handlers treat this the
//! same way they would treat a networked database.

use crate::error::AppError;
use crate::models::{Comment, Ride, RideParticipant, UserPreferences};
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;

/// Ride database handle. Cheap to clone; clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryDb {
    inner: Arc<Tables>,
}

#[derive(Default)]
struct Tables {
    rides: DashMap<String, Ride>,
    /// Participants per ride id
    participants: DashMap<String, Vec<RideParticipant>>,
    comments: DashMap<String, Comment>,
    /// Preferences per user id
    preferences: DashMap<String, UserPreferences>,
}

/// Fresh record identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Template order for listings: creation time, then id. Keeps expansion
/// output stable across calls.
fn sort_rides(rides: &mut [Ride]) {
    rides.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Ride Operations ─────────────────────────────────────────

    /// Get a ride template by id.
    pub async fn get_ride(&self, ride_id: &str) -> Result<Option<Ride>, AppError> {
        Ok(self.inner.rides.get(ride_id).map(|r| r.clone()))
    }

    /// All rides that are not archived.
    pub async fn get_active_rides(&self) -> Result<Vec<Ride>, AppError> {
        let mut rides: Vec<Ride> = self
            .inner
            .rides
            .iter()
            .filter(|r| !r.is_archived)
            .map(|r| r.clone())
            .collect();
        sort_rides(&mut rides);
        Ok(rides)
    }

    /// Rides organized by a user, archived ones included.
    pub async fn get_rides_by_organizer(&self, organizer_id: &str) -> Result<Vec<Ride>, AppError> {
        let mut rides: Vec<Ride> = self
            .inner
            .rides
            .iter()
            .filter(|r| r.organizer_id == organizer_id)
            .map(|r| r.clone())
            .collect();
        sort_rides(&mut rides);
        Ok(rides)
    }

    /// Insert or replace a ride.
    pub async fn upsert_ride(&self, ride: &Ride) -> Result<(), AppError> {
        self.inner.rides.insert(ride.id.clone(), ride.clone());
        Ok(())
    }

    /// Delete a ride along with its participants and comments.
    ///
    /// Returns `false` if the ride did not exist.
    pub async fn delete_ride(&self, ride_id: &str) -> Result<bool, AppError> {
        if self.inner.rides.remove(ride_id).is_none() {
            return Ok(false);
        }
        self.inner.participants.remove(ride_id);
        self.inner.comments.retain(|_, c| c.ride_id != ride_id);

        tracing::debug!(ride_id, "Deleted ride and dependent records");
        Ok(true)
    }

    // ─── Participant Operations ──────────────────────────────────

    pub async fn get_ride_participants(
        &self,
        ride_id: &str,
    ) -> Result<Vec<RideParticipant>, AppError> {
        Ok(self
            .inner
            .participants
            .get(ride_id)
            .map(|p| p.clone())
            .unwrap_or_default())
    }

    /// All participations of a user, across rides.
    pub async fn get_user_participations(
        &self,
        user_id: &str,
    ) -> Result<Vec<RideParticipant>, AppError> {
        let mut joined: Vec<RideParticipant> = self
            .inner
            .participants
            .iter()
            .flat_map(|entry| {
                entry
                    .value()
                    .iter()
                    .filter(|p| p.user_id == user_id)
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();
        joined.sort_by(|a, b| a.joined_at.cmp(&b.joined_at));
        Ok(joined)
    }

    /// Add a participant, enforcing uniqueness and capacity atomically.
    ///
    /// The ride must still exist while the participant list is locked, so a
    /// concurrent delete cannot leave an orphaned list behind.
    pub async fn add_ride_participant(
        &self,
        ride_id: &str,
        user_id: &str,
        max_participants: u32,
    ) -> Result<RideParticipant, AppError> {
        let entry = self.inner.participants.entry(ride_id.to_string());
        if !self.inner.rides.contains_key(ride_id) {
            return Err(AppError::NotFound(format!("Ride {} not found", ride_id)));
        }
        let mut entry = entry.or_default();

        if entry.iter().any(|p| p.user_id == user_id) {
            return Err(AppError::BadRequest("Already joined this ride".to_string()));
        }
        if entry.len() >= max_participants as usize {
            return Err(AppError::BadRequest("Ride is full".to_string()));
        }

        let participant = RideParticipant {
            id: new_id(),
            ride_id: ride_id.to_string(),
            user_id: user_id.to_string(),
            joined_at: Utc::now(),
        };
        entry.push(participant.clone());
        Ok(participant)
    }

    /// Remove a participant. Returns `false` if the user was not on the ride.
    pub async fn remove_ride_participant(
        &self,
        ride_id: &str,
        user_id: &str,
    ) -> Result<bool, AppError> {
        let Some(mut entry) = self.inner.participants.get_mut(ride_id) else {
            return Ok(false);
        };
        let before = entry.len();
        entry.retain(|p| p.user_id != user_id);
        Ok(entry.len() != before)
    }

    // ─── Comment Operations ──────────────────────────────────────

    /// Comments on a ride, oldest first.
    pub async fn get_ride_comments(&self, ride_id: &str) -> Result<Vec<Comment>, AppError> {
        let mut comments: Vec<Comment> = self
            .inner
            .comments
            .iter()
            .filter(|c| c.ride_id == ride_id)
            .map(|c| c.clone())
            .collect();
        comments.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(comments)
    }

    pub async fn get_comment(&self, comment_id: &str) -> Result<Option<Comment>, AppError> {
        Ok(self.inner.comments.get(comment_id).map(|c| c.clone()))
    }

    pub async fn create_comment(&self, comment: &Comment) -> Result<(), AppError> {
        self.inner
            .comments
            .insert(comment.id.clone(), comment.clone());
        Ok(())
    }

    pub async fn delete_comment(&self, comment_id: &str) -> Result<bool, AppError> {
        Ok(self.inner.comments.remove(comment_id).is_some())
    }

    // ─── Preference Operations ───────────────────────────────────

    pub async fn get_user_preferences(
        &self,
        user_id: &str,
    ) -> Result<Option<UserPreferences>, AppError> {
        Ok(self.inner.preferences.get(user_id).map(|p| p.clone()))
    }

    /// Create or replace a user's preferences.
    pub async fn upsert_user_preferences(&self, prefs: &UserPreferences) -> Result<(), AppError> {
        self.inner
            .preferences
            .insert(prefs.user_id.clone(), prefs.clone());
        Ok(())
    }
}
