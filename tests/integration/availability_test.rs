//! Tutor availability over HTTP.

use http::StatusCode;
use serde_json::json;

use crate::helpers::{OTHER_TUTOR, TUTOR, TestApp, student};

#[tokio::test]
async fn test_slot_defaults_and_overview() {
    let app = TestApp::new();
    let created = app
        .request(
            "POST",
            "/availability/slots",
            Some(json!({ "day": "Mon", "startTime": "09:30" })),
            Some(TUTOR),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);
    let slot = &created.body["data"];
    assert_eq!(slot["endTime"], "10:30");
    assert_eq!(slot["duration"], 60);
    assert_eq!(slot["capacity"], 1);
    assert_eq!(slot["mode"], "online");
    assert_eq!(slot["status"], "unpublished");
    assert_eq!(slot["booked"], false);

    let overview = app.request("GET", "/availability", None, Some(TUTOR)).await;
    assert_eq!(overview.status, StatusCode::OK);
    assert_eq!(overview.body["data"]["slots"].as_array().unwrap().len(), 1);
    assert_eq!(overview.body["data"]["weekUsage"], 0);
    assert_eq!(overview.body["data"]["policy"]["allowedHoursStart"], 7);
}

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    let app = TestApp::new();
    let response = app.request("GET", "/availability", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "AUTHENTICATION");
}

#[tokio::test]
async fn test_students_cannot_manage_availability() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/availability/slots",
            Some(json!({ "day": "Mon", "startTime": "09:00" })),
            Some(student("stu-1")),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_policy_limits_reject_out_of_hours_slot() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/availability/slots",
            Some(json!({ "day": "Tue", "startTime": "21:30" })),
            Some(TUTOR),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_code(), "POLICY_VIOLATION");

    let policy = app
        .request(
            "PUT",
            "/availability/policy",
            Some(json!({
                "allowedHoursStart": 6,
                "allowedHoursEnd": 23,
                "maxSlotsPerDay": 1,
                "maxSlotsPerWeek": 10,
            })),
            Some(TUTOR),
        )
        .await;
    assert_eq!(policy.status, StatusCode::OK);

    let late = app
        .request(
            "POST",
            "/availability/slots",
            Some(json!({ "day": "Tue", "startTime": "21:30" })),
            Some(TUTOR),
        )
        .await;
    assert_eq!(late.status, StatusCode::OK);

    let second = app
        .request(
            "POST",
            "/availability/slots",
            Some(json!({ "day": "Tue", "startTime": "08:00" })),
            Some(TUTOR),
        )
        .await;
    assert_eq!(second.error_code(), "POLICY_VIOLATION");
}

#[tokio::test]
async fn test_publish_is_idempotent() {
    let app = TestApp::new();
    let (slot_id, session_id) = app.published_slot(TUTOR, 2).await;

    let again = app
        .request(
            "POST",
            &format!("/availability/slots/{slot_id}/publish"),
            None,
            Some(TUTOR),
        )
        .await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.body["data"]["session"]["id"], session_id.as_str());

    let browse = app
        .request("GET", "/sessions/browse", None, Some(student("stu-1")))
        .await;
    assert_eq!(browse.body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_published_slot_cannot_be_edited() {
    let app = TestApp::new();
    let (slot_id, _) = app.published_slot(TUTOR, 1).await;
    let response = app
        .request(
            "PUT",
            &format!("/availability/slots/{slot_id}"),
            Some(json!({ "startTime": "11:00" })),
            Some(TUTOR),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "INVALID_STATE");
}

#[tokio::test]
async fn test_booked_slot_cannot_be_deleted() {
    let app = TestApp::new();
    let (slot_id, session_id) = app.published_slot(TUTOR, 1).await;
    let booking_id = app.book(student("stu-1"), &session_id).await;
    let confirmed = app
        .request(
            "POST",
            &format!("/tutor/bookings/{booking_id}/confirm"),
            None,
            Some(TUTOR),
        )
        .await;
    assert_eq!(confirmed.status, StatusCode::OK);

    let response = app
        .request("DELETE", &format!("/availability/slots/{slot_id}"), None, Some(TUTOR))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "INVALID_STATE");
    assert_eq!(app.slot(&slot_id).await["booked"], true);
}

#[tokio::test]
async fn test_delete_removes_unenrolled_session() {
    let app = TestApp::new();
    let (slot_id, session_id) = app.published_slot(TUTOR, 1).await;

    let deleted = app
        .request("DELETE", &format!("/availability/slots/{slot_id}"), None, Some(TUTOR))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let session = app
        .request("GET", &format!("/sessions/{session_id}"), None, Some(student("stu-1")))
        .await;
    assert_eq!(session.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_tutor_cannot_touch_slot() {
    let app = TestApp::new();
    let (slot_id, _) = app.published_slot(TUTOR, 1).await;
    let response = app
        .request(
            "DELETE",
            &format!("/availability/slots/{slot_id}"),
            None,
            Some(OTHER_TUTOR),
        )
        .await;
    assert!(response.status.is_client_error());
    assert_eq!(app.slot(&slot_id).await["status"], "published");
}

#[tokio::test]
async fn test_bulk_operations() {
    let app = TestApp::new();
    for start in ["09:00", "11:00", "13:00"] {
        let created = app
            .request(
                "POST",
                "/availability/slots",
                Some(json!({ "day": "Thu", "startTime": start })),
                Some(TUTOR),
            )
            .await;
        assert_eq!(created.status, StatusCode::OK);
    }
    let first = app.request("GET", "/availability", None, Some(TUTOR)).await;
    let first_id = first.body["data"]["slots"][0]["id"].as_str().unwrap().to_string();
    app.request(
        "POST",
        &format!("/availability/slots/{first_id}/publish"),
        None,
        Some(TUTOR),
    )
    .await;

    let deleted = app
        .request("DELETE", "/availability/bulk-delete-unpublished", None, Some(TUTOR))
        .await;
    assert_eq!(deleted.body["data"]["deleted"], 2);

    let published = app
        .request("POST", "/availability/publish-all", None, Some(TUTOR))
        .await;
    assert_eq!(published.body["data"]["count"], 0);
}

#[tokio::test]
async fn test_exceptions_roundtrip() {
    let app = TestApp::new();
    let added = app
        .request(
            "POST",
            "/availability/exceptions",
            Some(json!({ "startDate": "2031-12-24", "endDate": "2031-12-26", "reason": "Holiday" })),
            Some(TUTOR),
        )
        .await;
    assert_eq!(added.status, StatusCode::OK);
    let exception_id = added.str("id");

    let bad = app
        .request(
            "POST",
            "/availability/exceptions",
            Some(json!({ "startDate": "2031-12-26", "endDate": "2031-12-24" })),
            Some(TUTOR),
        )
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);

    let removed = app
        .request(
            "DELETE",
            &format!("/availability/exceptions/{exception_id}"),
            None,
            Some(TUTOR),
        )
        .await;
    assert_eq!(removed.status, StatusCode::OK);
}
