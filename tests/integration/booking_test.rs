//! Booking lifecycle over HTTP, coordinated in-process.

use http::StatusCode;
use serde_json::json;

use crate::helpers::{OTHER_TUTOR, TUTOR, TestApp, student};

#[tokio::test]
async fn test_confirm_takes_seat_and_slot() {
    let app = TestApp::new();
    let (slot_id, session_id) = app.published_slot(TUTOR, 1).await;
    let booking_id = app.book(student("stu-1"), &session_id).await;

    let pending = app
        .request("GET", "/tutor/bookings?status=pending", None, Some(TUTOR))
        .await;
    assert_eq!(pending.body["data"].as_array().unwrap().len(), 1);

    let confirmed = app
        .request(
            "POST",
            &format!("/tutor/bookings/{booking_id}/confirm"),
            None,
            Some(TUTOR),
        )
        .await;
    assert_eq!(confirmed.status, StatusCode::OK);
    assert_eq!(confirmed.body["data"]["status"], "confirmed");

    let session = app.session(&session_id).await;
    assert_eq!(session["enrolled"], 1);
    assert_eq!(session["availableSlots"], 0);

    let slot = app.slot(&slot_id).await;
    assert_eq!(slot["booked"], true);
    assert_eq!(slot["bookedBy"], "stu-1");
}

#[tokio::test]
async fn test_full_session_refuses_second_booking() {
    let app = TestApp::new();
    let (_, session_id) = app.published_slot(TUTOR, 1).await;
    let first = app.book(student("stu-1"), &session_id).await;
    app.request(
        "POST",
        &format!("/tutor/bookings/{first}/confirm"),
        None,
        Some(TUTOR),
    )
    .await;

    let second = app
        .request(
            "POST",
            "/bookings",
            Some(json!({ "sessionId": session_id })),
            Some(student("stu-2")),
        )
        .await;
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert_eq!(second.error_code(), "FULL");
    assert_eq!(second.body["retryable"], false);
}

#[tokio::test]
async fn test_confirm_on_full_session_leaves_booking_pending() {
    let mut config = tutorhub_core::config::AppConfig::default();
    config.booking.preflight_capacity_check = false;
    let app = TestApp::with_config(config);
    let (_, session_id) = app.published_slot(TUTOR, 1).await;
    let first = app.book(student("stu-1"), &session_id).await;
    let second = app.book(student("stu-2"), &session_id).await;

    let ok = app
        .request("POST", &format!("/tutor/bookings/{first}/confirm"), None, Some(TUTOR))
        .await;
    assert_eq!(ok.status, StatusCode::OK);

    let full = app
        .request("POST", &format!("/tutor/bookings/{second}/confirm"), None, Some(TUTOR))
        .await;
    assert_eq!(full.error_code(), "FULL");

    let mine = app
        .request("GET", &format!("/bookings/{second}"), None, Some(student("stu-2")))
        .await;
    assert_eq!(mine.body["data"]["status"], "pending");
    assert_eq!(app.session(&session_id).await["enrolled"], 1);
}

#[tokio::test]
async fn test_cancel_releases_seat_and_slot() {
    let app = TestApp::new();
    let (slot_id, session_id) = app.published_slot(TUTOR, 1).await;
    let booking_id = app.book(student("stu-1"), &session_id).await;
    app.request(
        "POST",
        &format!("/tutor/bookings/{booking_id}/confirm"),
        None,
        Some(TUTOR),
    )
    .await;

    let cancelled = app
        .request(
            "POST",
            &format!("/bookings/{booking_id}/cancel"),
            Some(json!({ "reason": "Exam clash" })),
            Some(student("stu-1")),
        )
        .await;
    assert_eq!(cancelled.status, StatusCode::OK);
    assert_eq!(cancelled.body["data"]["status"], "cancelled");
    assert_eq!(cancelled.body["data"]["cancelReason"], "Exam clash");

    assert_eq!(app.session(&session_id).await["enrolled"], 0);
    assert_eq!(app.slot(&slot_id).await["booked"], false);

    let again = app
        .request(
            "POST",
            &format!("/bookings/{booking_id}/cancel"),
            None,
            Some(student("stu-1")),
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.error_code(), "INVALID_STATE");
}

#[tokio::test]
async fn test_tutor_cancels_confirmed_booking() {
    let app = TestApp::new();
    let (slot_id, session_id) = app.published_slot(TUTOR, 1).await;
    let booking_id = app.book(student("stu-1"), &session_id).await;
    app.request(
        "POST",
        &format!("/tutor/bookings/{booking_id}/confirm"),
        None,
        Some(TUTOR),
    )
    .await;
    let path = format!("/tutor/bookings/{booking_id}/cancel");

    let foreign = app.request("POST", &path, None, Some(OTHER_TUTOR)).await;
    assert_eq!(foreign.status, StatusCode::FORBIDDEN);

    let by_student = app.request("POST", &path, None, Some(student("stu-1"))).await;
    assert_eq!(by_student.status, StatusCode::FORBIDDEN);

    let cancelled = app
        .request(
            "POST",
            &path,
            Some(json!({ "reason": "Tutor is ill" })),
            Some(TUTOR),
        )
        .await;
    assert_eq!(cancelled.status, StatusCode::OK);
    assert_eq!(cancelled.body["data"]["status"], "cancelled");
    assert_eq!(cancelled.body["data"]["cancelledBy"], TUTOR.id);
    assert_eq!(cancelled.body["data"]["cancelReason"], "Tutor is ill");

    assert_eq!(app.session(&session_id).await["enrolled"], 0);
    assert_eq!(app.seat_holders(&session_id).await, 0);
    assert_eq!(app.slot(&slot_id).await["booked"], false);

    // The freed seat can be booked again.
    let next = app.book(student("stu-2"), &session_id).await;
    let confirmed = app
        .request(
            "POST",
            &format!("/tutor/bookings/{next}/confirm"),
            None,
            Some(TUTOR),
        )
        .await;
    assert_eq!(confirmed.status, StatusCode::OK);
}

#[tokio::test]
async fn test_duplicate_booking_conflicts() {
    let app = TestApp::new();
    let (_, session_id) = app.published_slot(TUTOR, 3).await;
    app.book(student("stu-1"), &session_id).await;

    let duplicate = app
        .request(
            "POST",
            "/bookings",
            Some(json!({ "sessionId": session_id })),
            Some(student("stu-1")),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.error_code(), "CONFLICT");
}

#[tokio::test]
async fn test_reject_with_reason_then_rebook() {
    let app = TestApp::new();
    let (_, session_id) = app.published_slot(TUTOR, 1).await;
    let booking_id = app.book(student("stu-1"), &session_id).await;

    let rejected = app
        .request(
            "POST",
            &format!("/tutor/bookings/{booking_id}/reject"),
            Some(json!({ "reason": "Not this week" })),
            Some(TUTOR),
        )
        .await;
    assert_eq!(rejected.body["data"]["status"], "rejected");
    assert_eq!(rejected.body["data"]["rejectReason"], "Not this week");

    let confirm = app
        .request(
            "POST",
            &format!("/tutor/bookings/{booking_id}/confirm"),
            None,
            Some(TUTOR),
        )
        .await;
    assert_eq!(confirm.error_code(), "INVALID_STATE");

    app.book(student("stu-1"), &session_id).await;
}

#[tokio::test]
async fn test_other_tutor_cannot_decide() {
    let app = TestApp::new();
    let (_, session_id) = app.published_slot(TUTOR, 1).await;
    let booking_id = app.book(student("stu-1"), &session_id).await;

    let response = app
        .request(
            "POST",
            &format!("/tutor/bookings/{booking_id}/confirm"),
            None,
            Some(OTHER_TUTOR),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let hidden = app
        .request("GET", &format!("/bookings/{booking_id}"), None, Some(student("stu-9")))
        .await;
    assert_eq!(hidden.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_complete_updates_stats() {
    let app = TestApp::new();
    let (_, session_id) = app.published_slot(TUTOR, 2).await;
    for who in ["stu-1", "stu-2"] {
        let booking_id = app.book(student(who), &session_id).await;
        app.request(
            "POST",
            &format!("/tutor/bookings/{booking_id}/confirm"),
            None,
            Some(TUTOR),
        )
        .await;
        let done = app
            .request(
                "POST",
                &format!("/tutor/bookings/{booking_id}/complete"),
                None,
                Some(TUTOR),
            )
            .await;
        assert_eq!(done.body["data"]["status"], "completed");
    }

    let stats = app.request("GET", "/tutor/stats", None, Some(TUTOR)).await;
    assert_eq!(stats.status, StatusCode::OK);
    assert_eq!(stats.body["data"]["totalSessions"], 2);
    assert_eq!(stats.body["data"]["totalStudents"], 2);
    assert_eq!(stats.body["data"]["minutesTeaching"], 120);
}

#[tokio::test]
async fn test_student_lists_own_bookings() {
    let app = TestApp::new();
    let (_, session_id) = app.published_slot(TUTOR, 3).await;
    app.book(student("stu-1"), &session_id).await;
    app.book(student("stu-2"), &session_id).await;

    let mine = app.request("GET", "/bookings", None, Some(student("stu-1"))).await;
    let bookings = mine.body["data"].as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["studentId"], "stu-1");
    assert_eq!(bookings[0]["tutorId"], "tut-001");

    let bad_filter = app
        .request("GET", "/tutor/bookings?status=approved", None, Some(TUTOR))
        .await;
    assert_eq!(bad_filter.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/bookings",
            Some(json!({ "sessionId": "5f0c2c4e-8a3b-4c7d-9e10-2b3c4d5e6f70" })),
            Some(student("stu-1")),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
