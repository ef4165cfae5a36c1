//! Student catalog browsing.

use http::StatusCode;
use serde_json::json;

use crate::helpers::{OTHER_TUTOR, TUTOR, TestApp, student};

#[tokio::test]
async fn test_browse_filters() {
    let app = TestApp::new();
    let (_, full_session) = app.published_slot(TUTOR, 1).await;
    app.published_slot(OTHER_TUTOR, 2).await;

    let offline = app
        .request(
            "POST",
            "/availability/slots",
            Some(json!({
                "day": "Fri",
                "startTime": "14:00",
                "mode": "offline",
                "location": "Room 204",
                "courseCode": "MA201",
            })),
            Some(OTHER_TUTOR),
        )
        .await;
    let offline_id = offline.str("id");
    app.request(
        "POST",
        &format!("/availability/slots/{offline_id}/publish"),
        None,
        Some(OTHER_TUTOR),
    )
    .await;

    let booking_id = app.book(student("stu-1"), &full_session).await;
    app.request(
        "POST",
        &format!("/tutor/bookings/{booking_id}/confirm"),
        None,
        Some(TUTOR),
    )
    .await;

    let viewer = Some(student("stu-2"));
    let all = app.request("GET", "/sessions/browse", None, viewer).await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body["data"].as_array().unwrap().len(), 3);

    let available = app
        .request("GET", "/sessions/browse?onlyAvailable=true", None, viewer)
        .await;
    assert_eq!(available.body["data"].as_array().unwrap().len(), 2);

    let by_tutor = app
        .request("GET", "/sessions/browse?tutorId=tut-002", None, viewer)
        .await;
    assert_eq!(by_tutor.body["data"].as_array().unwrap().len(), 2);

    let by_course = app
        .request("GET", "/sessions/browse?courseCode=ma201", None, viewer)
        .await;
    let sessions = by_course.body["data"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["courseCode"], "MA201");

    let offline_only = app
        .request("GET", "/sessions/browse?mode=offline", None, viewer)
        .await;
    assert_eq!(offline_only.body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unpublished_slots_are_not_listed() {
    let app = TestApp::new();
    app.request(
        "POST",
        "/availability/slots",
        Some(json!({ "day": "Mon", "startTime": "10:00" })),
        Some(TUTOR),
    )
    .await;

    let browse = app
        .request("GET", "/sessions/browse", None, Some(student("stu-1")))
        .await;
    assert!(browse.body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_session_lookup_validates_id() {
    let app = TestApp::new();
    let response = app
        .request("GET", "/sessions/not-an-id", None, Some(student("stu-1")))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION");
}

#[tokio::test]
async fn test_health_reports_role() {
    let app = TestApp::new();
    let response = app.request("GET", "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["ok"], true);
    assert_eq!(response.body["svc"], "combined");
}
