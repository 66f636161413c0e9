// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User ride preference routes.

use crate::db::new_id;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{PreferencesInput, PreferencesPatch, UserPreferences};
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use std::sync::Arc;
use validator::Validate;

/// Preference routes (require authentication).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/preferences",
        get(get_preferences)
            .post(save_preferences)
            .patch(update_preferences),
    )
}

/// Current user's preferences, or `null` if never saved.
async fn get_preferences(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Option<UserPreferences>>> {
    Ok(Json(state.db.get_user_preferences(&user.user_id).await?))
}

/// Create or replace the current user's preferences.
async fn save_preferences(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<PreferencesInput>,
) -> Result<Json<UserPreferences>> {
    input.validate()?;

    let id = state
        .db
        .get_user_preferences(&user.user_id)
        .await?
        .map(|existing| existing.id)
        .unwrap_or_else(new_id);

    let prefs = UserPreferences::from_input(id, user.user_id, input);
    state.db.upsert_user_preferences(&prefs).await?;

    tracing::debug!(user_id = %prefs.user_id, "Preferences saved");
    Ok(Json(prefs))
}

/// Partially update existing preferences.
async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(patch): Json<PreferencesPatch>,
) -> Result<Json<UserPreferences>> {
    let existing = state
        .db
        .get_user_preferences(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Preferences not set".to_string()))?;

    let mut input = existing.to_input();
    patch.apply(&mut input);
    input.validate()?;

    let prefs = UserPreferences::from_input(existing.id, existing.user_id, input);
    state.db.upsert_user_preferences(&prefs).await?;
    Ok(Json(prefs))
}
