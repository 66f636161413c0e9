// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Join/leave and comment API tests.

use axum::http::StatusCode;
use chrono::{Datelike, Days, Local};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;
use common::{create_test_app, create_test_jwt, json_body, request, ride_body};

/// Create a ride (capacity 2) as `token` and return its id.
async fn create_ride(app: &axum::Router, token: &str, body: Value) -> String {
    let response = app
        .clone()
        .oneshot(request("POST", "/api/rides", Some(token), Some(body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await["id"]
        .as_str()
        .unwrap()
        .to_string()
}

fn upcoming_ride() -> Value {
    let date = Local::now()
        .date_naive()
        .checked_add_days(Days::new(5))
        .unwrap();
    ride_body(date)
}

#[tokio::test]
async fn test_join_full_and_duplicate() {
    let (app, state) = create_test_app();
    let key = &state.config.jwt_signing_key;
    let organizer = create_test_jwt("organizer", key);
    let alice = create_test_jwt("alice", key);
    let bob = create_test_jwt("bob", key);
    let carol = create_test_jwt("carol", key);

    let ride_id = create_ride(&app, &organizer, upcoming_ride()).await;
    let join_uri = format!("/api/rides/{}/join", ride_id);

    let response = app
        .clone()
        .oneshot(request("POST", &join_uri, Some(alice.as_str()), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let participant = json_body(response).await;
    assert_eq!(participant["rideId"], ride_id.as_str());
    assert_eq!(participant["userId"], "alice");

    let response = app
        .clone()
        .oneshot(request("POST", &join_uri, Some(alice.as_str()), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["details"], "Already joined this ride");

    let response = app
        .clone()
        .oneshot(request("POST", &join_uri, Some(bob.as_str()), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(request("POST", &join_uri, Some(carol.as_str()), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["details"], "Ride is full");

    let response = app
        .oneshot(request(
            "GET",
            &format!("/api/rides/{}/participants", ride_id),
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_join_occurrence_joins_series() {
    let (app, state) = create_test_app();
    let key = &state.config.jwt_signing_key;
    let organizer = create_test_jwt("organizer", key);
    let alice = create_test_jwt("alice", key);

    let today = Local::now().date_naive();
    let mut body = ride_body(today.checked_sub_days(Days::new(7)).unwrap());
    body["isRecurring"] = json!(true);
    body["recurrencePattern"] = json!("weekly");
    body["recurrenceDayOfWeek"] = json!(today.weekday().num_days_from_sunday());
    let template_id = create_ride(&app, &organizer, body).await;

    // Pick an occurrence id straight from the listing
    let response = app
        .clone()
        .oneshot(request("GET", "/api/rides?days=14", None, None))
        .await
        .unwrap();
    let listing = json_body(response).await;
    let occurrence_id = listing[1]["id"].as_str().unwrap().to_string();
    assert_ne!(occurrence_id, template_id);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/api/rides/{}/join", occurrence_id),
            Some(alice.as_str()),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json_body(response).await["rideId"], template_id.as_str());

    let response = app
        .clone()
        .oneshot(request("GET", "/api/joined-rides", Some(alice.as_str()), None))
        .await
        .unwrap();
    let joined = json_body(response).await;
    assert_eq!(joined.as_array().unwrap().len(), 1);
    assert_eq!(joined[0]["id"], template_id.as_str());

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/joined-rides?expand=true&days=14",
            Some(alice.as_str()),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 2);

    // Leaving via the template id drops the whole series
    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/rides/{}/leave", template_id),
            Some(alice.as_str()),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(request("GET", "/api/joined-rides", Some(alice.as_str()), None))
        .await
        .unwrap();
    assert!(json_body(response).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_join_missing_or_archived_ride() {
    let (app, state) = create_test_app();
    let key = &state.config.jwt_signing_key;
    let organizer = create_test_jwt("organizer", key);
    let alice = create_test_jwt("alice", key);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/rides/missing/join",
            Some(alice.as_str()),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let ride_id = create_ride(&app, &organizer, upcoming_ride()).await;
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/api/rides/{}/archive", ride_id),
            Some(organizer.as_str()),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request(
            "POST",
            &format!("/api/rides/{}/join", ride_id),
            Some(alice.as_str()),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_comments_lifecycle() {
    let (app, state) = create_test_app();
    let key = &state.config.jwt_signing_key;
    let organizer = create_test_jwt("organizer", key);
    let alice = create_test_jwt("alice", key);

    let ride_id = create_ride(&app, &organizer, upcoming_ride()).await;
    let comments_uri = format!("/api/rides/{}/comments", ride_id);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &comments_uri,
            Some(alice.as_str()),
            Some(json!({"content": "Is there a coffee stop?"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let comment = json_body(response).await;
    let comment_id = comment["id"].as_str().unwrap().to_string();
    assert_eq!(comment["userId"], "alice");

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &comments_uri,
            Some(alice.as_str()),
            Some(json!({"content": ""})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Posting requires a session; reading does not
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &comments_uri,
            None,
            Some(json!({"content": "anonymous"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(request("GET", &comments_uri, None, None))
        .await
        .unwrap();
    let comments = json_body(response).await;
    assert_eq!(comments.as_array().unwrap().len(), 1);
    assert_eq!(comments[0]["content"], "Is there a coffee stop?");

    let delete_uri = format!("/api/comments/{}", comment_id);
    let response = app
        .clone()
        .oneshot(request("DELETE", &delete_uri, Some(organizer.as_str()), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(request("DELETE", &delete_uri, Some(alice.as_str()), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(request("DELETE", &delete_uri, Some(alice.as_str()), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
