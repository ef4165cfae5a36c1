//! Shared test helpers for integration tests.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use tutorhub_api::{AppState, build_app, wire};
use tutorhub_core::config::AppConfig;
use tutorhub_core::events::EventBus;
use tutorhub_core::types::SessionId;

/// Identity the gateway would assert for a request.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub id: &'static str,
    pub role: &'static str,
}

pub const TUTOR: Caller = Caller {
    id: "tut-001",
    role: "tutor",
};

pub const OTHER_TUTOR: Caller = Caller {
    id: "tut-002",
    role: "tutor",
};

pub fn student(id: &'static str) -> Caller {
    Caller {
        id,
        role: "student",
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Wired state, for direct inspection
    pub state: AppState,
}

impl TestApp {
    /// Create a combined-mode application with default config
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(mut config: AppConfig) -> Self {
        config.coordination.reconcile_enabled = false;
        let wiring = wire(config, EventBus::default()).expect("Failed to wire application");
        Self {
            router: build_app(wiring.state.clone()),
            state: wiring.state,
        }
    }

    /// Make a request, optionally with a JSON body and caller identity
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        caller: Option<Caller>,
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);

        if let Some(caller) = caller {
            req = req
                .header("x-subject-id", caller.id)
                .header("x-subject-role", caller.role)
                .header("x-subject-name", format!("{} name", caller.id));
        }

        let req = match body {
            Some(body) => req
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&body).expect("Failed to serialize body"),
                )),
            None => req.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Create and publish a Wednesday 10:00 slot; returns (slot id, session id)
    pub async fn published_slot(&self, tutor: Caller, capacity: u32) -> (String, String) {
        let created = self
            .request(
                "POST",
                "/availability/slots",
                Some(json!({
                    "day": "Wed",
                    "startTime": "10:00",
                    "capacity": capacity,
                    "courseCode": "CS101",
                    "courseTitle": "Intro to Programming",
                })),
                Some(tutor),
            )
            .await;
        assert_eq!(created.status, StatusCode::OK, "create slot: {}", created.body);
        let slot_id = created.str("id");

        let published = self
            .request(
                "POST",
                &format!("/availability/slots/{slot_id}/publish"),
                None,
                Some(tutor),
            )
            .await;
        assert_eq!(published.status, StatusCode::OK, "publish: {}", published.body);
        let session_id = published.body["data"]["session"]["id"]
            .as_str()
            .expect("session id")
            .to_string();
        (slot_id, session_id)
    }

    /// Open a pending booking; returns its id
    pub async fn book(&self, who: Caller, session_id: &str) -> String {
        let response = self
            .request(
                "POST",
                "/bookings",
                Some(json!({ "sessionId": session_id, "message": "Looking forward" })),
                Some(who),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "book: {}", response.body);
        response.str("id")
    }

    pub async fn session(&self, session_id: &str) -> Value {
        let response = self
            .request("GET", &format!("/sessions/{session_id}"), None, Some(student("viewer")))
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response.body["data"].clone()
    }

    /// Number of bookings holding a seat, read straight from the catalog
    pub async fn seat_holders(&self, session_id: &str) -> usize {
        let session_id: SessionId = session_id.parse().expect("session id");
        self.state
            .sessions()
            .expect("sessions side")
            .catalog
            .get(session_id)
            .await
            .expect("session")
            .session
            .holders
            .len()
    }

    pub async fn slot(&self, slot_id: &str) -> Value {
        let response = self
            .request("GET", &format!("/internal/slots/{slot_id}"), None, None)
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response.body["data"].clone()
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// A string field of `data`
    pub fn str(&self, field: &str) -> String {
        self.body["data"][field]
            .as_str()
            .unwrap_or_else(|| panic!("missing data.{field} in {}", self.body))
            .to_string()
    }

    /// The `error` code of a failed request
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
