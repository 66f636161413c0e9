// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use chrono::{NaiveDate, TimeZone, Utc};
use group_rides::config::Config;
use group_rides::db::MemoryDb;
use group_rides::middleware::auth::create_jwt;
use group_rides::models::Ride;
use group_rides::routes::create_router;
use group_rides::AppState;
use serde_json::Value;
use std::sync::Arc;

/// Create a test app with an empty in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::default(),
        db: MemoryDb::new(),
    });

    (create_router(state.clone()), state)
}

/// Create a session token the auth middleware accepts.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    create_jwt(user_id, signing_key).expect("Failed to create test JWT")
}

/// Build a request, optionally authenticated, with an optional JSON body.
#[allow(dead_code)]
pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

#[allow(dead_code)]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A one-off ride.
#[allow(dead_code)]
pub fn one_off_ride(id: &str, on: NaiveDate) -> Ride {
    Ride {
        id: id.to_string(),
        title: format!("Ride {}", id),
        ride_type: "road".to_string(),
        date: on,
        time: "08:00".to_string(),
        city: "Portola Valley".to_string(),
        state: "CA".to_string(),
        zip_code: Some("94028".to_string()),
        latitude: Some(37.384),
        longitude: Some(-122.235),
        distance: 30,
        difficulty: "intermediate".to_string(),
        pace: "moderate".to_string(),
        terrain: "hilly".to_string(),
        max_participants: 12,
        description: None,
        organizer_id: "organizer".to_string(),
        is_archived: false,
        created_at: Utc.with_ymd_and_hms(2024, 11, 1, 12, 0, 0).unwrap(),
        is_recurring: false,
        recurrence_pattern: None,
        recurrence_day_of_week: None,
        recurrence_end_date: None,
    }
}

/// A recurring ride template.
#[allow(dead_code)]
pub fn recurring_ride(id: &str, anchor: NaiveDate, pattern: &str, day_of_week: Option<u8>) -> Ride {
    Ride {
        is_recurring: true,
        recurrence_pattern: Some(pattern.to_string()),
        recurrence_day_of_week: day_of_week,
        ..one_off_ride(id, anchor)
    }
}

/// Minimal valid body for `POST /api/rides`.
#[allow(dead_code)]
pub fn ride_body(on: NaiveDate) -> Value {
    serde_json::json!({
        "title": "Saturday Skyline Loop",
        "type": "road",
        "date": on.to_string(),
        "time": "08:00",
        "city": "Woodside",
        "state": "CA",
        "distance": 42,
        "difficulty": "intermediate",
        "pace": "moderate",
        "terrain": "hilly",
        "maxParticipants": 2
    })
}
