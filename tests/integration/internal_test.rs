//! The internal sessions RPC surface.

use http::StatusCode;
use serde_json::json;

use crate::helpers::{TUTOR, TestApp};

#[tokio::test]
async fn test_enroll_until_full() {
    let app = TestApp::new();
    let (_, session_id) = app.published_slot(TUTOR, 1).await;
    let enroll = format!("/internal/enroll/{session_id}");
    let unenroll = format!("/internal/unenroll/{session_id}");
    let first_booking = json!({ "bookingId": "0b1c2d3e-4f50-4a6b-8c7d-9e0f1a2b3c4d" });
    let second_booking = json!({ "bookingId": "1c2d3e4f-5061-4b7c-9d8e-0f1a2b3c4d5e" });

    let first = app
        .request("POST", &enroll, Some(first_booking.clone()), None)
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["data"], json!({ "enrolled": 1, "capacity": 1 }));

    // A retried enroll for the same booking keeps its one seat.
    let retried = app
        .request("POST", &enroll, Some(first_booking.clone()), None)
        .await;
    assert_eq!(retried.status, StatusCode::OK);
    assert_eq!(retried.body["data"]["enrolled"], 1);
    assert_eq!(app.seat_holders(&session_id).await, 1);

    let second = app
        .request("POST", &enroll, Some(second_booking.clone()), None)
        .await;
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert_eq!(second.error_code(), "FULL");

    let snapshot = app
        .request("GET", &format!("/internal/{session_id}"), None, None)
        .await;
    assert_eq!(snapshot.body["data"]["enrolled"], 1);
    assert_eq!(snapshot.body["data"]["status"], "full");

    // Releasing a seat the booking never held changes nothing.
    let stranger = app
        .request("POST", &unenroll, Some(second_booking), None)
        .await;
    assert_eq!(stranger.body["data"]["enrolled"], 1);

    let released = app
        .request("POST", &unenroll, Some(first_booking.clone()), None)
        .await;
    assert_eq!(released.body["data"]["enrolled"], 0);

    let again = app.request("POST", &unenroll, Some(first_booking), None).await;
    assert_eq!(again.body["data"]["enrolled"], 0);
    assert_eq!(app.seat_holders(&session_id).await, 0);
}

#[tokio::test]
async fn test_enroll_requires_booking_id() {
    let app = TestApp::new();
    let (_, session_id) = app.published_slot(TUTOR, 1).await;
    let response = app
        .request("POST", &format!("/internal/enroll/{session_id}"), Some(json!({})), None)
        .await;
    assert!(response.status.is_client_error());
    assert_eq!(app.seat_holders(&session_id).await, 0);
}

#[tokio::test]
async fn test_enroll_unknown_session() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/internal/enroll/5f0c2c4e-8a3b-4c7d-9e10-2b3c4d5e6f70",
            Some(json!({ "bookingId": "0b1c2d3e-4f50-4a6b-8c7d-9e0f1a2b3c4d" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_book_and_unbook_slot() {
    let app = TestApp::new();
    let (slot_id, _) = app.published_slot(TUTOR, 1).await;

    let body = json!({ "tutorId": TUTOR.id, "studentId": "stu-1" });
    let booked = app
        .request(
            "PUT",
            &format!("/internal/slots/{slot_id}/book"),
            Some(body.clone()),
            None,
        )
        .await;
    assert_eq!(booked.status, StatusCode::OK);
    assert_eq!(booked.body["data"]["bookedBy"], "stu-1");

    // Repeating for the same student is a no-op.
    let repeat = app
        .request("PUT", &format!("/internal/slots/{slot_id}/book"), Some(body), None)
        .await;
    assert_eq!(repeat.status, StatusCode::OK);

    let taken = app
        .request(
            "PUT",
            &format!("/internal/slots/{slot_id}/book"),
            Some(json!({ "tutorId": TUTOR.id, "studentId": "stu-2" })),
            None,
        )
        .await;
    assert_eq!(taken.error_code(), "FULL");

    let unbooked = app
        .request(
            "PUT",
            &format!("/internal/slots/{slot_id}/unbook"),
            Some(json!({ "tutorId": TUTOR.id })),
            None,
        )
        .await;
    assert_eq!(unbooked.status, StatusCode::OK);
    assert_eq!(unbooked.body["data"]["booked"], false);
}
