//! # tutorhub-api
//!
//! HTTP API layer for TutorHub built on Axum.
//!
//! Serves the public tutor and student routes, the internal sessions RPC
//! surface consumed by a remote bookings process, middleware (CORS,
//! request logging, tracing), the identity extractor, DTOs, and the
//! mapping from [`tutorhub_core::AppError`] to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{Wiring, build_app, run_server, wire};
pub use error::ApiError;
pub use state::AppState;
